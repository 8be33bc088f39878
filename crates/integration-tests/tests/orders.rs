//! Integration tests for orders.
//!
//! These tests require:
//! - A running `MongoDB` deployment
//! - The server running (cargo run -p plantnet-server)

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use plantnet_integration_tests::{
    base_url, create_plant, database, place_order, signed_in_client, unique_email,
};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running server and MongoDB"]
async fn test_customer_orders_are_enriched() {
    let customer = unique_email("buyer");
    let someone_else = unique_email("bystander");
    let client = signed_in_client(&customer).await;

    let plant_id = create_plant(&client, "monstera", 10).await;
    let mine = place_order(&client, &plant_id, &customer).await;
    let theirs = place_order(&client, &plant_id, &someone_else).await;

    let orders: Vec<Value> = client
        .get(format!("{}/customer-orders/{customer}", base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order["_id"], mine.as_str());
    assert_ne!(order["_id"], theirs.as_str());
    assert_eq!(order["customer"]["email"], customer.as_str());
    assert_eq!(order["name"], "monstera");
    assert_eq!(order["category"], "Indoor");
    assert!(order["image"].is_string());
    assert!(order.get("plants").is_none());
}

#[tokio::test]
#[ignore = "Requires running server and MongoDB"]
async fn test_cancel_pending_order() {
    let customer = unique_email("canceller");
    let client = signed_in_client(&customer).await;
    let plant_id = create_plant(&client, "fern", 2).await;
    let order_id = place_order(&client, &plant_id, &customer).await;

    let resp = client
        .delete(format!("{}/orders/{order_id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["deletedCount"], 1);

    let again = client
        .delete(format!("{}/orders/{order_id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and MongoDB"]
async fn test_cannot_cancel_delivered_order() {
    let customer = unique_email("delivered");
    let client = signed_in_client(&customer).await;
    let plant_id = create_plant(&client, "cactus", 2).await;
    let order_id = place_order(&client, &plant_id, &customer).await;

    let oid = ObjectId::parse_str(&order_id).unwrap();
    let orders = database().await.collection::<Document>("Orders");
    orders
        .update_one(doc! { "_id": oid }, doc! { "$set": { "status": "Delivered" } })
        .await
        .unwrap();

    let resp = client
        .delete(format!("{}/orders/{order_id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(
        resp.text().await.unwrap(),
        "Cannot cancel once the product is delivered!"
    );

    let still_there = orders.find_one(doc! { "_id": oid }).await.unwrap();
    assert!(still_there.is_some());
}
