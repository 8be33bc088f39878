//! Authentication extractor.
//!
//! Requires a valid session token in the `token` cookie.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::{SESSION_COOKIE, SessionClaims, User};
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// Rejects the request with `401 {"message": "unauthorized access"}` when
/// the cookie is missing or the token fails verification.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(claims): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claims.email)
/// }
/// ```
pub struct RequireAuth(pub SessionClaims);

/// Error returned when authentication is required but the request carries no valid token.
#[derive(Debug)]
pub enum AuthRejection {
    /// Unauthorized response.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "unauthorized access" })),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
            .ok_or(AuthRejection::Unauthorized)?;

        let claims = state.tokens().verify(&token).map_err(|err| {
            match &err {
                AuthError::Expired => tracing::debug!("Session token expired"),
                _ => tracing::warn!(error = %err, "Session token rejected"),
            }
            AuthRejection::Unauthorized
        })?;

        set_sentry_user(claims.email.as_str());
        Ok(Self(claims))
    }
}

/// Extractor that requires a signed-in user whose stored role is `admin`.
///
/// The role is read from the store on every request rather than trusted
/// from the token, so a demoted admin loses access immediately.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(claims) = RequireAuth::from_request_parts(parts, state).await?;

        let user = UserRepository::new(state.db())
            .get_by_email(&claims.email)
            .await?
            .filter(User::is_admin)
            .ok_or_else(|| {
                tracing::warn!(email = %claims.email, "Admin route denied");
                AppError::Forbidden("forbidden access".to_owned())
            })?;

        Ok(Self(user))
    }
}
