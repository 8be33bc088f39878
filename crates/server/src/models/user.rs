//! User domain types.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use plantnet_core::{Email, UserRole, UserStatus};

use super::{RESERVED_FIELDS, strip_fields};

/// Fields set by the server on sign-up; client values are ignored.
const SIGN_UP_FIELDS: &[&str] = &["email", "role", "status", "timestamp"];

/// A marketplace user as stored in the `users` collection.
///
/// Profile fields sent by the client at first login (name, image, ...) are
/// kept in `profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(flatten)]
    pub profile: Document,
}

impl User {
    /// Whether a role change request is already waiting for an admin.
    #[must_use]
    pub fn has_pending_request(&self) -> bool {
        self.status == Some(UserStatus::Requested)
    }

    /// Whether this user may manage other users' roles.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(UserRole::Admin)
    }
}

/// Build the document inserted when a user signs in for the first time.
///
/// The client's profile is kept; `email`, `role`, `status`, `timestamp`, and
/// `_id` are owned by the server. New users are always customers.
#[must_use]
pub fn sign_up_document(email: &Email, mut profile: Document, now_millis: i64) -> Document {
    strip_fields(&mut profile, RESERVED_FIELDS);
    strip_fields(&mut profile, SIGN_UP_FIELDS);

    profile.insert("email", email.as_str());
    profile.insert("timestamp", now_millis);
    profile.insert("role", UserRole::Customer.as_str());
    profile
}

/// Filter matching every user except `email`.
#[must_use]
pub fn others_filter(email: &Email) -> Document {
    doc! { "email": { "$ne": email.as_str() } }
}

/// Body of an admin role change.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RoleUpdate {
    pub role: UserRole,
}
