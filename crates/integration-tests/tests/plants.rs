//! Integration tests for plant listings and stock adjustments.
//!
//! These tests require:
//! - A running `MongoDB` deployment
//! - The server running (cargo run -p plantnet-server)

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use plantnet_integration_tests::{
    base_url, client, create_plant, get_plant, signed_in_client, unique_email,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn adjust(client: &reqwest::Client, id: &str, amount: i64, status: &str) -> Value {
    let resp = client
        .patch(format!("{}/plants/quantity/{id}", base_url()))
        .json(&json!({ "quantityToUpdate": amount, "status": status }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

#[tokio::test]
#[ignore = "Requires running server and MongoDB"]
async fn test_created_plant_is_listed_verbatim() {
    let client = signed_in_client(&unique_email("seller")).await;
    let id = create_plant(&client, "calathea", 4).await;

    let plant = get_plant(&client, &id).await;
    assert_eq!(plant["_id"], id.as_str());
    assert_eq!(plant["name"], "calathea");
    assert_eq!(plant["description"], "Integration test plant");

    let plants: Vec<Value> = client
        .get(format!("{}/plants", base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(plants.iter().any(|p| p["_id"] == id.as_str()));
}

#[tokio::test]
#[ignore = "Requires running server and MongoDB"]
async fn test_quantity_increase_and_decrease() {
    let client = signed_in_client(&unique_email("stock")).await;
    let id = create_plant(&client, "pothos", 3).await;

    let outcome = adjust(&client, &id, 5, "increase").await;
    assert_eq!(outcome["matchedCount"], 1);
    assert_eq!(get_plant(&client, &id).await["quantity"], 8);

    adjust(&client, &id, 5, "decrease").await;
    assert_eq!(get_plant(&client, &id).await["quantity"], 3);

    // Anything but the exact string "increase" decrements, below zero too
    adjust(&client, &id, 5, "Increase").await;
    assert_eq!(get_plant(&client, &id).await["quantity"], -2);
}

#[tokio::test]
#[ignore = "Requires running server and MongoDB"]
async fn test_plant_writes_require_session() {
    let resp = client()
        .post(format!("{}/plants", base_url()))
        .json(&json!({ "name": "x", "category": "y", "price": 1.0, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and MongoDB"]
async fn test_plant_details_unknown_and_malformed() {
    let client = client();

    let body = client
        .get(format!("{}/plantDetails/000000000000000000000000", base_url()))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "null");

    let resp = client
        .get(format!("{}/plantDetails/fern", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
