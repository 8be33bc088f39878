//! Session token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use plantnet_core::Email;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "token";

/// Claims carried by a session token.
///
/// `email` identifies the user; any other identity fields the client sent
/// at login are kept in `extra` and returned unchanged on verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The signed-in user's email.
    pub email: Email,
    /// Issued at (seconds since the Unix epoch).
    pub iat: i64,
    /// Expiry (seconds since the Unix epoch).
    pub exp: i64,
    /// Additional identity fields from the login payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Identity payload posted to `/jwt`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityPayload {
    pub email: Email,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
