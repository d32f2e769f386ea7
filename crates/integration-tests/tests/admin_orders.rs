//! Integration tests for admin order fulfillment.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - Both servers running, and the admin test account created
//!
//! Run with: cargo test -p animart-integration-tests -- --ignored

use animart_integration_tests::{
    admin_base_url, admin_sign_in, client, json_body, register_customer, storefront_base_url,
};
use reqwest::{Client, StatusCode};
use serde_json::json;

/// Place an order through the storefront and return its id.
async fn place_test_order() -> i64 {
    let admin = client();
    admin_sign_in(&admin).await;
    let base = admin_base_url();

    let categories = json_body(
        admin
            .get(format!("{base}/api/categories"))
            .send()
            .await
            .expect("Failed to list categories"),
    )
    .await;
    let category_id = categories["categories"][0]["id"]
        .as_i64()
        .expect("a seeded category");

    let created = json_body(
        admin
            .post(format!("{base}/api/products"))
            .json(&json!({
                "name": format!("Fulfillment Test Mug {}", uuid::Uuid::new_v4().simple()),
                "description": "Created by the fulfillment integration test.",
                "price": "9.99",
                "stock": 10,
                "status": "published",
                "categoryId": category_id,
            }))
            .send()
            .await
            .expect("Failed to create product"),
    )
    .await;
    let product_id = created["product"]["id"].as_i64().expect("product id");

    let shopper = client();
    register_customer(&shopper).await;
    shopper
        .post(format!("{}/api/cart/items", storefront_base_url()))
        .json(&json!({ "productId": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add to cart");

    let order = json_body(
        shopper
            .post(format!("{}/api/checkout", storefront_base_url()))
            .json(&json!({
                "shippingAddress": {
                    "fullName": "Fulfillment Shopper",
                    "line1": "2 Test Street",
                    "city": "Testville",
                    "postalCode": "12345",
                    "country": "US",
                }
            }))
            .send()
            .await
            .expect("Failed to place order"),
    )
    .await;

    order["order"]["id"].as_i64().expect("order id")
}

async fn set_status(
    admin: &Client,
    order_id: i64,
    body: serde_json::Value,
) -> reqwest::Response {
    admin
        .patch(format!("{}/api/orders/{order_id}/status", admin_base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to update status")
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn order_endpoints_require_admin_session() {
    let anonymous = client();
    let resp = anonymous
        .get(format!("{}/api/orders", admin_base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn shipping_an_order_stamps_shipped_at_and_tracking() {
    let order_id = place_test_order().await;
    let admin = client();
    admin_sign_in(&admin).await;

    let resp = set_status(&admin, order_id, json!({ "status": "processing" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["order"]["status"], "processing");

    let resp = set_status(
        &admin,
        order_id,
        json!({
            "status": "shipped",
            "trackingNumber": "TRACK-123",
            "adminNotes": "left with neighbour if absent"
        }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let order = json_body(resp).await["order"].clone();
    assert_eq!(order["status"], "shipped");
    assert_eq!(order["trackingNumber"], "TRACK-123");
    assert_eq!(order["adminNotes"], "left with neighbour if absent");
    assert!(order["shippedAt"].is_string(), "shippedAt should be stamped");
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn unknown_status_value_is_a_validation_error() {
    let order_id = place_test_order().await;
    let admin = client();
    admin_sign_in(&admin).await;

    let resp = set_status(&admin, order_id, json!({ "status": "teleported" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("unknown status value"),
        "error should name the bad status: {body}"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn skipping_a_step_is_rejected() {
    let order_id = place_test_order().await;
    let admin = client();
    admin_sign_in(&admin).await;

    // pending -> shipped skips processing
    let resp = set_status(&admin, order_id, json!({ "status": "shipped" })).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn delivered_orders_are_terminal() {
    let order_id = place_test_order().await;
    let admin = client();
    admin_sign_in(&admin).await;

    for status in ["processing", "shipped", "delivered"] {
        let resp = set_status(&admin, order_id, json!({ "status": status })).await;
        assert_eq!(resp.status(), StatusCode::OK, "transition to {status}");
    }

    let resp = set_status(&admin, order_id, json!({ "status": "cancelled" })).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn refunding_flips_payment_status() {
    let order_id = place_test_order().await;
    let admin = client();
    admin_sign_in(&admin).await;

    let resp = set_status(&admin, order_id, json!({ "status": "refunded" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let order = json_body(resp).await["order"].clone();
    assert_eq!(order["status"], "refunded");
    assert_eq!(order["paymentStatus"], "refunded");
}
