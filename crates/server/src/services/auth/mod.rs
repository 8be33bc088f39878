//! Session token service.
//!
//! Signs and verifies the HS256 tokens carried in the `token` cookie, and
//! builds the cookies that set and clear them.

mod error;

pub use error::AuthError;

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};

use crate::config::Environment;
use crate::models::{IdentityPayload, SESSION_COOKIE, SessionClaims};

/// How long a session token stays valid.
pub const TOKEN_TTL_DAYS: i64 = 365;

/// Claim names the service sets itself; client values are dropped.
const RESERVED_CLAIMS: &[&str] = &["email", "iat", "exp"];

/// Issues and verifies session tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service keyed with `secret`.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    /// Sign a token for `identity`, valid for [`TOKEN_TTL_DAYS`] from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn issue(&self, identity: IdentityPayload) -> Result<String, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    /// Sign a token for `identity` as if issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn issue_at(
        &self,
        identity: IdentityPayload,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let IdentityPayload { email, mut extra } = identity;
        for claim in RESERVED_CLAIMS {
            extra.remove(*claim);
        }

        let claims = SessionClaims {
            email,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
            extra,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(AuthError::TokenCreation)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Expired` if the token has expired.
    /// Returns `AuthError::InvalidToken` for any other verification failure.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

/// Build the cookie carrying a freshly issued session token.
///
/// Production serves the client from another site over HTTPS, so the
/// cookie is `Secure; SameSite=None` there and `SameSite=Strict` otherwise.
#[must_use]
pub fn session_cookie(token: String, environment: Environment) -> Cookie<'static> {
    let production = environment.is_production();
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Strict
        })
        .path("/")
        .build()
}

/// Build a cookie that clears the session token.
///
/// Carries the same attributes as [`session_cookie`] so browsers match it.
#[must_use]
pub fn removal_cookie(environment: Environment) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), environment);
    cookie.make_removal();
    cookie
}
