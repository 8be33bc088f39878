//! Document store access for the marketplace.
//!
//! # Database: `plantNet-session` (`MongoDB`)
//!
//! ## Collections
//!
//! - `users` - Marketplace users, keyed by email
//! - `plants` - Plant listings with stock counts
//! - `Orders` - Customer orders referencing plants by hex id
//!
//! The client is opened once at startup and shared through
//! [`AppState`](crate::state::AppState). Repositories borrow the database
//! handle and perform exactly one store operation per call.
//!
//! # Indexes
//!
//! Indexes are NOT created on startup. Create them explicitly via:
//! ```bash
//! cargo run -p plantnet-cli -- indexes
//! ```

pub mod orders;
pub mod outcome;
pub mod plants;
pub mod users;

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::DatabaseConfig;

pub use orders::OrderRepository;
pub use outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
pub use plants::PlantRepository;
pub use users::UserRepository;

/// Name of the users collection.
pub const USERS: &str = "users";
/// Name of the plants collection.
pub const PLANTS: &str = "plants";
/// Name of the orders collection.
pub const ORDERS: &str = "Orders";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Error from the `MongoDB` driver.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Open a `MongoDB` client and return the configured database handle.
///
/// The driver connects lazily; use [`ping`] to check reachability.
///
/// # Errors
///
/// Returns `mongodb::error::Error` if the connection string is invalid or
/// (for `mongodb+srv://` URLs) the SRV lookup fails.
pub async fn connect(config: &DatabaseConfig) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(config.url.expose_secret()).await?;
    options.app_name = Some("plantnet-server".to_owned());
    options.server_selection_timeout = Some(Duration::from_secs(10));
    options.max_pool_size = Some(10);
    options.min_pool_size = Some(2);

    let client = Client::with_options(options)?;
    Ok(client.database(&config.name))
}

/// Ping the deployment.
///
/// # Errors
///
/// Returns an error if no server answers within the selection timeout.
pub async fn ping(db: &Database) -> Result<(), RepositoryError> {
    db.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}

/// Parse a path identifier into an `ObjectId`.
///
/// Returns `None` for anything that is not 24 hex characters.
#[must_use]
pub fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}
