//! User route handlers.
//!
//! Users are addressed by email in the path. First login creates the
//! record; afterwards a customer can ask for a role change, which an admin
//! grants through `PATCH /users/role/{email}`.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use mongodb::bson::{Bson, Document};
use serde_json::{Value, json};
use tracing::instrument;

use super::parse_email;
use crate::db::{UpdateOutcome, UserRepository};
use crate::error::{AppError, Result};
use crate::json::{bson_to_json, document_to_json};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::RoleUpdate;
use crate::state::AppState;

/// Rejection text the web client shows when a request is already pending.
pub const ALREADY_REQUESTED: &str = "You have already requested,wait for some time.";

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{email}", post(upsert_user).patch(request_role_change))
        .route("/users/role/{email}", get(get_role).patch(update_role))
        .route("/allUsers/{email}", get(list_other_users))
}

/// Return the stored user for `email`, creating a customer on first login.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the path is not an email address.
/// Returns `AppError::Database` if the store operation fails.
#[instrument(skip(state, profile))]
pub async fn upsert_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(profile): Json<Document>,
) -> Result<Json<Value>> {
    let email = parse_email(&email)?;
    let user = UserRepository::new(state.db())
        .upsert_by_email(&email, profile)
        .await?;
    Ok(Json(document_to_json(user)))
}

/// Mark the user as waiting for a role change.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the user does not exist or already
/// has a pending request.
/// Returns `AppError::Database` if the store operation fails.
#[instrument(skip(state, claims), fields(caller = %claims.email))]
pub async fn request_role_change(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UpdateOutcome>> {
    let email = parse_email(&email)?;
    let outcome = UserRepository::new(state.db())
        .request_role_change(&email)
        .await?;

    if outcome.matched_count == 0 {
        return Err(AppError::BadRequest(ALREADY_REQUESTED.to_owned()));
    }

    tracing::info!("Role change requested");
    Ok(Json(outcome))
}

/// Return `{"role": ...}` for the user, or `{}` if unknown.
///
/// The stored value is returned whatever it holds.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the path is not an email address.
/// Returns `AppError::Database` if the store operation fails.
pub async fn get_role(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Value>> {
    let email = parse_email(&email)?;
    let role = UserRepository::new(state.db()).find_role(&email).await?;
    Ok(Json(role_body(role)))
}

fn role_body(role: Option<Bson>) -> Value {
    match role {
        Some(role) => json!({ "role": bson_to_json(role) }),
        None => json!({}),
    }
}

/// Set a user's role and clear their pending request. Admin only.
///
/// # Errors
///
/// Returns `AppError::Database` with `NotFound` if no user has this email.
pub async fn update_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(update): Json<RoleUpdate>,
) -> Result<Json<UpdateOutcome>> {
    let email = parse_email(&email)?;
    let outcome = UserRepository::new(state.db())
        .set_role(&email, update.role)
        .await?;

    tracing::info!(
        admin = %admin.email,
        user = %email,
        role = %update.role,
        "Role updated"
    );
    Ok(Json(outcome))
}

/// List every user except the one in the path.
///
/// # Errors
///
/// Returns `AppError::Database` if the store operation fails.
pub async fn list_other_users(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Value>>> {
    let email = parse_email(&email)?;
    let users = UserRepository::new(state.db()).list_except(&email).await?;
    Ok(Json(users.into_iter().map(document_to_json).collect()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use mongodb::bson::doc;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::routes::app;
    use crate::state::AppState;

    #[test]
    fn test_role_body_returns_stored_value() {
        assert_eq!(
            role_body(Some(Bson::String("Seller".to_owned()))),
            json!({ "role": "Seller" })
        );
        assert_eq!(role_body(Some(Bson::Int32(2))), json!({ "role": 2 }));
        assert_eq!(role_body(None), json!({}));
    }

    #[test]
    fn test_listed_users_need_no_known_fields() {
        let rendered = document_to_json(doc! { "name": "NoEmail", "role": "Seller" });
        assert_eq!(rendered, json!({ "name": "NoEmail", "role": "Seller" }));
    }

    #[tokio::test]
    async fn test_role_request_requires_auth() {
        let response = app(AppState::for_tests().await)
            .oneshot(
                Request::patch("/users/a@x.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_role_update_requires_auth() {
        let response = app(AppState::for_tests().await)
            .oneshot(
                Request::patch("/users/role/a@x.com")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"role":"seller"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_email_path() {
        let response = app(AppState::for_tests().await)
            .oneshot(
                Request::get("/users/role/not-an-email")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
