//! Session token error types.

use thiserror::Error;

/// Errors that can occur while issuing or verifying session tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token signature, format, or claims are invalid.
    #[error("invalid session token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    /// Token was valid but has expired.
    #[error("session token expired")]
    Expired,

    /// Token could not be signed.
    #[error("failed to sign session token: {0}")]
    TokenCreation(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::InvalidToken(err),
        }
    }
}
