//! Session route handlers.
//!
//! `/jwt` signs a session token for the identity the client obtained from
//! its sign-in provider and stores it in the `token` cookie; `/logout`
//! clears it.

use axum::{Json, extract::State};
use axum_extra::extract::CookieJar;
use serde_json::{Value, json};
use tracing::instrument;

use crate::error::{Result, clear_sentry_user};
use crate::models::IdentityPayload;
use crate::services::auth::{removal_cookie, session_cookie};
use crate::state::AppState;

/// Issue a session token cookie.
///
/// # Errors
///
/// Returns `AppError::Auth` if the token cannot be signed.
#[instrument(skip_all, fields(email = %identity.email))]
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(identity): Json<IdentityPayload>,
) -> Result<(CookieJar, Json<Value>)> {
    let token = state.tokens().issue(identity)?;
    let cookie = session_cookie(token, state.config().environment);

    tracing::info!("Session token issued");
    Ok((jar.add(cookie), Json(json!({ "success": true }))))
}

/// Clear the session token cookie.
///
/// Always succeeds, whether or not the request carried a cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    clear_sentry_user();
    let jar = jar.add(removal_cookie(state.config().environment));
    (jar, Json(json!({ "success": true })))
}
