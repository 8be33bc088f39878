//! Application state shared across handlers.

use std::sync::Arc;

use mongodb::Database;

use crate::config::ServerConfig;
use crate::services::auth::TokenService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the store handle, token keys, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    db: Database,
    tokens: TokenService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `db` - Handle to the `MongoDB` database
    #[must_use]
    pub fn new(config: ServerConfig, db: Database) -> Self {
        let tokens = TokenService::new(&config.token_secret);

        Self {
            inner: Arc::new(AppStateInner { config, db, tokens }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database handle.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Get a reference to the session token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by a client pointed at a closed port.
    ///
    /// The driver connects lazily, so routes that never reach the store
    /// can be exercised without `MongoDB`.
    #[allow(clippy::unwrap_used)]
    pub(crate) async fn for_tests() -> Self {
        use std::time::Duration;

        use mongodb::Client;
        use mongodb::options::ClientOptions;

        let mut options = ClientOptions::parse("mongodb://127.0.0.1:1").await.unwrap();
        options.server_selection_timeout = Some(Duration::from_millis(200));
        let client = Client::with_options(options).unwrap();

        Self::new(ServerConfig::for_tests(), client.database("plantnet-test"))
    }

    /// `Cookie` header value carrying a valid session for `email`.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn test_session_cookie(&self, email: &str) -> String {
        let identity = serde_json::from_value(serde_json::json!({ "email": email })).unwrap();
        let token = self.tokens().issue(identity).unwrap();
        format!("{}={token}", crate::models::SESSION_COOKIE)
    }
}
