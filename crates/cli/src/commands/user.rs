//! User role management.
//!
//! # Usage
//!
//! ```bash
//! # Promote a user who asked to sell
//! plantnet-cli user set-role -e grower@example.com -r seller
//!
//! # Bootstrap the first admin
//! plantnet-cli user set-role -e owner@example.com -r admin
//! ```

use plantnet_core::{Email, UserRole};
use plantnet_server::db::{RepositoryError, UserRepository};
use thiserror::Error;

use super::{CommandError, connect};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: customer, seller, admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No user has this email.
    #[error("No user with email {0}. Users are created on first sign-in.")]
    NotFound(String),

    /// Connecting or updating failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Set a user's role and clear any pending role request.
///
/// # Errors
///
/// Returns an error if the email or role is invalid, the user does not
/// exist, or the update fails.
pub async fn set_role(email: &str, role: &str) -> Result<(), UserError> {
    let role: UserRole = role
        .parse()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email).map_err(|_| UserError::InvalidEmail(email.to_owned()))?;

    let db = connect().await?;
    let users = UserRepository::new(&db);

    let had_request = users
        .get_by_email(&email)
        .await
        .map_err(CommandError::from)?
        .is_some_and(|user| user.has_pending_request());

    match users.set_role(&email, role).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => return Err(UserError::NotFound(email.to_string())),
        Err(e) => return Err(CommandError::from(e).into()),
    }

    tracing::info!(%email, %role, "Role updated");
    if had_request {
        tracing::info!("Pending role request cleared");
    }
    Ok(())
}
