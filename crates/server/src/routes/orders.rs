//! Order route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use serde_json::Value;
use tracing::instrument;

use super::{parse_email, parse_id};
use crate::db::orders::Cancellation;
use crate::db::{DeleteOutcome, InsertOutcome, OrderRepository};
use crate::error::{AppError, Result};
use crate::json::document_to_json;
use crate::middleware::RequireAuth;
use crate::models::NewOrder;
use crate::state::AppState;

/// Rejection text the web client shows for a delivered order.
pub const ALREADY_DELIVERED: &str = "Cannot cancel once the product is delivered!";

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(place_order))
        .route("/customer-orders/{email}", get(customer_orders))
        .route("/orders/{id}", delete(cancel_order))
}

/// Place an order.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if `plantId` is not an object id.
/// Returns `AppError::Database` if the insert fails.
#[instrument(skip(state, claims, order), fields(caller = %claims.email, plant_id = %order.plant_id))]
pub async fn place_order(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Json(order): Json<NewOrder>,
) -> Result<Json<InsertOutcome>> {
    let order = order.validate().map_err(AppError::BadRequest)?;
    let outcome = OrderRepository::new(state.db()).insert(&order).await?;

    tracing::info!(id = %outcome.inserted_id, "Order placed");
    Ok(Json(outcome))
}

/// List a customer's orders with plant name, image, and category.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the path is not an email address.
/// Returns `AppError::Database` if the aggregation fails.
pub async fn customer_orders(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Value>>> {
    let email = parse_email(&email)?;
    let orders = OrderRepository::new(state.db())
        .list_for_customer(&email)
        .await?;
    Ok(Json(orders.into_iter().map(document_to_json).collect()))
}

/// Cancel an order that has not been delivered.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no order has this id.
/// Returns `AppError::Conflict` if the order was delivered.
/// Returns `AppError::Database` if the store operation fails.
#[instrument(skip(state, claims), fields(caller = %claims.email))]
pub async fn cancel_order(
    RequireAuth(claims): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>> {
    let oid = parse_id(&id)?;

    match OrderRepository::new(state.db()).cancel(oid).await? {
        Cancellation::Deleted(outcome) => {
            tracing::info!("Order cancelled");
            Ok(Json(outcome))
        }
        Cancellation::Refused(status) => {
            tracing::info!(%status, "Cancellation refused");
            Err(AppError::Conflict(ALREADY_DELIVERED.to_owned()))
        }
        Cancellation::Missing => Err(AppError::NotFound(format!("order {id}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use crate::routes::app;
    use crate::state::AppState;

    #[tokio::test]
    async fn test_place_order_requires_auth() {
        let response = app(AppState::for_tests().await)
            .oneshot(
                Request::post("/order")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"plantId":"65f1a2b3c4d5e6f708192a3b","customer":{"email":"c@x.com"}}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cancel_requires_auth() {
        let response = app(AppState::for_tests().await)
            .oneshot(
                Request::delete("/orders/65f1a2b3c4d5e6f708192a3b")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cancel_rejects_malformed_id_when_signed_in() {
        let state = AppState::for_tests().await;
        let cookie = state.test_session_cookie("c@x.com");

        let response = app(state)
            .oneshot(
                Request::delete("/orders/not-an-id")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
