//! Domain models for the marketplace.
//!
//! Typed models exist only where a rule reads a field (roles, statuses,
//! stock counts, plant references). Everything else a client sends is kept
//! in a flattened `Document` so bodies are stored as-is.

pub mod order;
pub mod plant;
pub mod session;
pub mod user;

pub use order::{NewOrder, Order, OrderCustomer};
pub use plant::{NewPlant, QuantityUpdate};
pub use session::{IdentityPayload, SESSION_COOKIE, SessionClaims};
pub use user::{RoleUpdate, User};

use mongodb::bson::Document;

/// Fields the store owns; stripped from client-supplied documents.
pub(crate) const RESERVED_FIELDS: &[&str] = &["_id"];

/// Remove store-owned fields from a client document.
pub(crate) fn strip_fields(doc: &mut Document, fields: &[&str]) {
    for field in fields {
        doc.remove(*field);
    }
}
