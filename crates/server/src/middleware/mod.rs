//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, bind hub per request)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (credentialed requests from the web client)
//! 5. Security headers
//!
//! Authentication is enforced per handler by the [`RequireAuth`] and
//! [`RequireAdmin`] extractors.

pub mod auth;
pub mod cors;
pub mod request_id;
pub mod security_headers;

pub use auth::{AuthRejection, RequireAdmin, RequireAuth};
pub use cors::cors_layer;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
