//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - Greeting
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (pings the store)
//!
//! # Session
//! POST   /jwt                       - Issue session token cookie
//! GET    /logout                    - Clear session token cookie
//!
//! # Users
//! POST   /users/{email}             - Get or create user (first login)
//! PATCH  /users/{email}             - Request a role change (auth)
//! GET    /users/role/{email}        - Get a user's role
//! PATCH  /users/role/{email}        - Set a user's role (admin)
//! GET    /allUsers/{email}          - List users except one
//!
//! # Plants
//! POST   /plants                    - Add a listing (auth)
//! GET    /plants                    - List all plants
//! GET    /plantDetails/{id}         - Get one plant
//! PATCH  /plants/quantity/{id}      - Adjust stock (auth)
//!
//! # Orders
//! POST   /order                     - Place an order (auth)
//! GET    /customer-orders/{email}   - List a customer's orders
//! DELETE /orders/{id}               - Cancel an order (auth)
//! ```

pub mod auth;
pub mod home;
pub mod orders;
pub mod plants;
pub mod users;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use mongodb::bson::oid::ObjectId;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use plantnet_core::Email;

use crate::db::parse_object_id;
use crate::error::AppError;
use crate::middleware::{cors_layer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/jwt", post(auth::issue_token))
        .route("/logout", get(auth::logout))
        .merge(users::router())
        .merge(plants::router())
        .merge(orders::router())
}

/// Build the application with health checks and the middleware stack.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config());

    Router::new()
        .route("/health", get(home::health))
        .route("/health/ready", get(home::readiness))
        .merge(routes())
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Parse an email path segment.
pub(crate) fn parse_email(raw: &str) -> Result<Email, AppError> {
    Email::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Parse an object id path segment.
pub(crate) fn parse_id(raw: &str) -> Result<ObjectId, AppError> {
    parse_object_id(raw).ok_or_else(|| AppError::BadRequest(format!("invalid id: {raw}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn test_parse_helpers() {
        assert!(parse_email("a@x.com").is_ok());
        assert!(matches!(parse_email("nope"), Err(AppError::BadRequest(_))));
        assert!(parse_id("65f1a2b3c4d5e6f708192a3b").is_ok());
        assert!(matches!(parse_id("65f1"), Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_credentials() {
        let response = app(AppState::for_tests().await)
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/plants")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_unknown_origin() {
        let response = app(AppState::for_tests().await)
            .oneshot(
                Request::get("/")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_responses_carry_request_id_and_security_headers() {
        let response = app(AppState::for_tests().await)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert!(headers.get("x-request-id").is_some());
        assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    }
}
