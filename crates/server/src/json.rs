//! Rendering stored documents as client JSON.
//!
//! The web client expects plain JSON: object ids as 24-char hex strings and
//! dates as RFC 3339 strings, not `MongoDB` extended JSON wrappers.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};

/// Convert a BSON value to plain JSON.
#[must_use]
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map_or_else(|_| Value::from(dt.timestamp_millis()), Value::String),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(n) => Value::from(n),
        Bson::Int64(n) => Value::from(n),
        Bson::Double(n) => serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number),
        Bson::Null | Bson::Undefined => Value::Null,
        other => other.into_relaxed_extjson(),
    }
}

/// Convert a document to a plain JSON object.
#[must_use]
pub fn document_to_json(doc: Document) -> Value {
    let map: Map<String, Value> = doc
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mongodb::bson::doc;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_object_ids_become_hex_strings() {
        let id = ObjectId::parse_str("65f1a2b3c4d5e6f708192a3b").unwrap();
        let rendered = document_to_json(doc! {
            "_id": id,
            "plantId": "65f1a2b3c4d5e6f708192a3b",
            "nested": { "ref": id },
            "list": [id],
        });

        assert_eq!(
            rendered,
            json!({
                "_id": "65f1a2b3c4d5e6f708192a3b",
                "plantId": "65f1a2b3c4d5e6f708192a3b",
                "nested": { "ref": "65f1a2b3c4d5e6f708192a3b" },
                "list": ["65f1a2b3c4d5e6f708192a3b"],
            })
        );
    }

    #[test]
    fn test_numbers_keep_their_kind() {
        let rendered = document_to_json(doc! {
            "quantity": 12_i32,
            "timestamp": 1_718_000_000_000_i64,
            "price": 14.5,
            "note": Bson::Null,
        });

        assert_eq!(
            rendered,
            json!({
                "quantity": 12,
                "timestamp": 1_718_000_000_000_i64,
                "price": 14.5,
                "note": null,
            })
        );
    }

    #[test]
    fn test_dates_render_as_rfc3339() {
        let dt = mongodb::bson::DateTime::from_millis(0);
        let rendered = bson_to_json(Bson::DateTime(dt));
        assert!(rendered.as_str().unwrap().starts_with("1970-01-01T00:00:00"));
    }
}
