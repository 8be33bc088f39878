//! User repository for the `users` collection.
//!
//! Users are keyed by email. Each method performs a single store operation.
//! Records served to clients are read as raw documents; the typed [`User`]
//! is only used where a rule reads the role.

use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use plantnet_core::{Email, UserRole, UserStatus};

use super::{RepositoryError, USERS, UpdateOutcome};
use crate::models::User;
use crate::models::user::{others_filter, sign_up_document};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn documents(&self) -> Collection<Document> {
        self.db.collection(USERS)
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = self
            .users()
            .find_one(doc! { "email": email.as_str() })
            .await?;
        Ok(user)
    }

    /// Return the stored user for `email`, creating a customer if none exists.
    ///
    /// An existing record is returned unchanged. Creation uses
    /// `$setOnInsert` with `upsert`, so repeated or concurrent first logins
    /// converge on a single record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the operation fails.
    /// Returns `RepositoryError::DataCorruption` if the store returns no document.
    pub async fn upsert_by_email(
        &self,
        email: &Email,
        profile: Document,
    ) -> Result<Document, RepositoryError> {
        let on_insert = sign_up_document(email, profile, Utc::now().timestamp_millis());

        self.documents()
            .find_one_and_update(
                doc! { "email": email.as_str() },
                doc! { "$setOnInsert": on_insert },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!("upsert returned no user for {email}"))
            })
    }

    /// Read the stored `role` field as is.
    ///
    /// `None` when the user does not exist or has no role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_role(&self, email: &Email) -> Result<Option<Bson>, RepositoryError> {
        let user = self
            .documents()
            .find_one(doc! { "email": email.as_str() })
            .projection(doc! { "_id": 0, "role": 1 })
            .await?;
        Ok(user.and_then(|mut user| user.remove("role")))
    }

    /// Mark a role change as requested.
    ///
    /// Only matches a user whose request is not already pending, so a
    /// `matched_count` of zero means the user is missing or has already
    /// asked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn request_role_change(&self, email: &Email) -> Result<UpdateOutcome, RepositoryError> {
        let requested = UserStatus::Requested.as_str();
        let result = self
            .documents()
            .update_one(
                doc! { "email": email.as_str(), "status": { "$ne": requested } },
                doc! { "$set": { "status": requested } },
            )
            .await?;
        Ok(result.into())
    }

    /// Set a user's role and clear any pending request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this email.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_role(&self, email: &Email, role: UserRole) -> Result<UpdateOutcome, RepositoryError> {
        let result = self
            .documents()
            .update_one(
                doc! { "email": email.as_str() },
                doc! {
                    "$set": { "role": role.as_str() },
                    "$unset": { "status": "" },
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(result.into())
    }

    /// List every user except the one with `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_except(&self, email: &Email) -> Result<Vec<Document>, RepositoryError> {
        let users = self
            .documents()
            .find(others_filter(email))
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }
}
