//! Plant listing types.
//!
//! Listings posted over HTTP are stored as sent and served back verbatim as
//! documents. Seed files go through the stricter [`NewPlant`].

use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use plantnet_core::QuantityChange;

use super::{RESERVED_FIELDS, strip_fields};

/// Prepare a posted listing for insertion.
///
/// Every field is kept with the type the client sent; only store-owned
/// fields are dropped.
#[must_use]
pub fn listing_document(mut body: Document) -> Document {
    strip_fields(&mut body, RESERVED_FIELDS);
    body
}

/// A plant listing loaded from a seed file.
///
/// Fields other than the ones below (description, seller, ...) are stored
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlant {
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: f64,
    pub quantity: i64,
    #[serde(flatten)]
    pub details: Document,
}

impl NewPlant {
    /// Check the listing and drop store-owned fields.
    ///
    /// # Errors
    ///
    /// Returns a client-facing message if the name is blank, the price is
    /// negative or not finite, or the quantity is negative.
    pub fn validate(mut self) -> Result<Self, String> {
        if self.name.trim().is_empty() {
            return Err("plant name cannot be empty".to_owned());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("plant price must be a non-negative number".to_owned());
        }
        if self.quantity < 0 {
            return Err("plant quantity cannot be negative".to_owned());
        }
        strip_fields(&mut self.details, RESERVED_FIELDS);
        Ok(self)
    }
}

/// Body of a stock adjustment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityUpdate {
    pub quantity_to_update: i64,
    pub status: String,
}

impl QuantityUpdate {
    /// Interpret the body as a signed change.
    #[must_use]
    pub fn change(&self) -> QuantityChange {
        QuantityChange::from_request(self.quantity_to_update, &self.status)
    }
}

/// Update document applying a stock change as a single increment.
#[must_use]
pub fn quantity_update(change: QuantityChange) -> Document {
    doc! { "$inc": { "quantity": change.signed_delta() } }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mongodb::bson::{self, Bson};
    use serde_json::json;

    use super::*;

    fn new_plant(value: serde_json::Value) -> Result<NewPlant, String> {
        serde_json::from_value::<NewPlant>(value)
            .map_err(|e| e.to_string())?
            .validate()
    }

    fn posted(value: serde_json::Value) -> Document {
        listing_document(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_listing_document_keeps_client_types() {
        let stored = posted(json!({
            "name": "Fern",
            "category": "Indoor",
            "image": "x",
            "price": 12,
            "quantity": 3,
        }));

        assert_eq!(stored.get("price"), Some(&Bson::Int32(12)));
        assert_eq!(stored.get("quantity"), Some(&Bson::Int32(3)));
    }

    #[test]
    fn test_listing_document_accepts_partial_bodies() {
        let stored = posted(json!({ "name": "Fern", "price": "12.50", "quantity": 3 }));

        assert_eq!(stored.get_str("price").unwrap(), "12.50");
        assert!(stored.get("category").is_none());
    }

    #[test]
    fn test_listing_document_drops_client_id() {
        let stored = posted(json!({ "_id": "65f1a2b3c4d5e6f708192a3b", "name": "Fern" }));
        assert!(stored.get("_id").is_none());
        assert_eq!(stored.get_str("name").unwrap(), "Fern");
    }

    #[test]
    fn test_new_plant_keeps_extra_fields() {
        let plant = new_plant(json!({
            "name": "Monstera",
            "category": "Indoor",
            "image": "https://img/monstera.png",
            "price": 24.5,
            "quantity": 8,
            "description": "Split leaves",
            "seller": { "email": "s@x.com", "name": "Sam" },
        }))
        .unwrap();

        let stored = bson::to_document(&plant).unwrap();
        assert_eq!(stored.get_str("name").unwrap(), "Monstera");
        assert_eq!(stored.get_i64("quantity").unwrap(), 8);
        assert_eq!(stored.get_str("description").unwrap(), "Split leaves");
        assert_eq!(
            stored.get_document("seller").unwrap().get_str("email").unwrap(),
            "s@x.com"
        );
    }

    #[test]
    fn test_new_plant_drops_client_id() {
        let plant = new_plant(json!({
            "_id": "65f1a2b3c4d5e6f708192a3b",
            "name": "Fern",
            "category": "Indoor",
            "price": 5,
            "quantity": 1,
        }))
        .unwrap();

        assert!(bson::to_document(&plant).unwrap().get("_id").is_none());
    }

    #[test]
    fn test_new_plant_rejects_bad_values() {
        let base = |price: f64, quantity: i64, name: &str| {
            json!({ "name": name, "category": "c", "price": price, "quantity": quantity })
        };

        assert!(new_plant(base(1.0, 1, "  ")).is_err());
        assert!(new_plant(base(-1.0, 1, "Fern")).is_err());
        assert!(new_plant(base(1.0, -1, "Fern")).is_err());
        assert!(new_plant(json!({ "name": "Fern" })).is_err());
    }

    #[test]
    fn test_quantity_update_increase() {
        let body: QuantityUpdate =
            serde_json::from_value(json!({ "quantityToUpdate": 5, "status": "increase" })).unwrap();
        assert_eq!(quantity_update(body.change()), doc! { "$inc": { "quantity": 5_i64 } });
    }

    #[test]
    fn test_quantity_update_other_status_decreases() {
        let body: QuantityUpdate =
            serde_json::from_value(json!({ "quantityToUpdate": 5, "status": "purchase" })).unwrap();
        assert_eq!(quantity_update(body.change()), doc! { "$inc": { "quantity": -5_i64 } });
    }
}
