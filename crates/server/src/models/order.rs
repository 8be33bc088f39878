//! Order domain types and the customer order listing pipeline.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use plantnet_core::{Email, OrderStatus};

use super::{RESERVED_FIELDS, strip_fields};
use crate::db::PLANTS;

/// Customer embedded in an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub email: Email,
    #[serde(flatten)]
    pub profile: Document,
}

/// An order placed by a customer.
///
/// `plant_id` is kept as hex text, which is how the web client stores the
/// reference; it must parse as an object id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub plant_id: String,
    pub customer: OrderCustomer,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(flatten)]
    pub details: Document,
}

impl NewOrder {
    /// Check the order and drop store-owned fields.
    ///
    /// # Errors
    ///
    /// Returns a client-facing message if `plantId` is not an object id.
    pub fn validate(mut self) -> Result<Self, String> {
        if ObjectId::parse_str(&self.plant_id).is_err() {
            return Err(format!("invalid plantId: {}", self.plant_id));
        }
        strip_fields(&mut self.details, RESERVED_FIELDS);
        Ok(self)
    }
}

/// A stored order, read when deciding whether it can be cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(flatten)]
    pub details: Document,
}

/// Filter matching an order only while it may still be cancelled.
#[must_use]
pub fn cancellable_filter(id: ObjectId) -> Document {
    doc! { "_id": id, "status": { "$ne": OrderStatus::Delivered.as_str() } }
}

/// Aggregation listing a customer's orders annotated with plant details.
///
/// Stages: match on the embedded customer email, convert the stored
/// `plantId` text to an object id, join the plant, copy its name, image,
/// and category onto the order, and drop the joined plant.
#[must_use]
pub fn customer_orders_pipeline(email: &Email) -> Vec<Document> {
    vec![
        doc! { "$match": { "customer.email": email.as_str() } },
        doc! { "$addFields": { "plantId": { "$toObjectId": "$plantId" } } },
        doc! {
            "$lookup": {
                "from": PLANTS,
                "localField": "plantId",
                "foreignField": "_id",
                "as": "plants",
            }
        },
        doc! { "$unwind": "$plants" },
        doc! {
            "$addFields": {
                "name": "$plants.name",
                "image": "$plants.image",
                "category": "$plants.category",
            }
        },
        doc! { "$project": { "plants": 0 } },
    ]
}
