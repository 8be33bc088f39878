//! Integration tests for the PlantNet API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start MongoDB and the server
//! docker run -d -p 27017:27017 mongo:7
//! PLANTNET_DATABASE_URL=mongodb://localhost:27017 cargo run -p plantnet-server
//!
//! # Run integration tests
//! cargo test -p plantnet-integration-tests -- --ignored
//! ```
//!
//! Tests talk to the server over HTTP and use the store directly only to
//! arrange state the API cannot produce (admins, delivered orders).
//!
//! # Environment Variables
//!
//! - `PLANTNET_BASE_URL` - Server under test (default: `http://localhost:9000`)
//! - `PLANTNET_DATABASE_URL`, `PLANTNET_DATABASE_NAME` - Same store as the server

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use mongodb::Database;
use plantnet_server::config::DatabaseConfig;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("PLANTNET_BASE_URL").unwrap_or_else(|_| "http://localhost:9000".to_string())
}

/// A unique address so runs never collide.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@plantnet.test", Uuid::new_v4().simple())
}

/// Create a client with a cookie store.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Create a client holding a session for `email`.
pub async fn signed_in_client(email: &str) -> Client {
    let client = client();
    let resp = client
        .post(format!("{}/jwt", base_url()))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Failed to request token");
    assert_eq!(resp.status(), StatusCode::OK);
    client
}

/// Open the store the server under test uses.
pub async fn database() -> Database {
    let config = DatabaseConfig::from_env().expect("Store configuration missing");
    plantnet_server::db::connect(&config)
        .await
        .expect("Failed to connect to MongoDB")
}

/// Create (or fetch) a user through the first-login upsert.
pub async fn upsert_user(client: &Client, email: &str, profile: Value) -> Value {
    let resp = client
        .post(format!("{}/users/{email}", base_url()))
        .json(&profile)
        .send()
        .await
        .expect("Failed to upsert user");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Invalid user JSON")
}

/// Insert a plant and return its id.
pub async fn create_plant(client: &Client, name: &str, quantity: i64) -> String {
    let resp = client
        .post(format!("{}/plants", base_url()))
        .json(&json!({
            "name": name,
            "category": "Indoor",
            "image": format!("https://img.plantnet.test/{name}.jpg"),
            "price": 18.5,
            "quantity": quantity,
            "description": "Integration test plant",
        }))
        .send()
        .await
        .expect("Failed to create plant");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["acknowledged"], json!(true));
    body["insertedId"].as_str().unwrap().to_owned()
}

/// Fetch a plant by id.
pub async fn get_plant(client: &Client, id: &str) -> Value {
    client
        .get(format!("{}/plantDetails/{id}", base_url()))
        .send()
        .await
        .expect("Failed to get plant")
        .json()
        .await
        .expect("Invalid plant JSON")
}

/// Place an order and return its id.
pub async fn place_order(client: &Client, plant_id: &str, customer_email: &str) -> String {
    let resp = client
        .post(format!("{}/order", base_url()))
        .json(&json!({
            "plantId": plant_id,
            "customer": { "email": customer_email, "name": "Test Customer" },
            "price": 18.5,
            "quantity": 1,
            "address": "1 Leaf Lane",
        }))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    body["insertedId"].as_str().unwrap().to_owned()
}
