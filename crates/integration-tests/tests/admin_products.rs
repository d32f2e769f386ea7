//! Integration tests for admin stock management.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running, and the admin test account created
//!
//! Run with: cargo test -p animart-integration-tests -- --ignored

use animart_integration_tests::{admin_base_url, admin_sign_in, client, json_body};
use reqwest::{Client, StatusCode};
use serde_json::json;

/// Create a published product with a known stock level, returning its id.
async fn create_product(admin: &Client, stock: i32) -> i64 {
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

    let resp = admin
        .post(format!("{base}/api/products"))
        .json(&json!({
            "name": format!("Stock Test Figure {}", uuid::Uuid::new_v4().simple()),
            "description": "Created by the stock integration test.",
            "price": "9.99",
            "stock": stock,
            "status": "published",
            "categoryId": category_id,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);

    json_body(resp).await["product"]["id"]
        .as_i64()
        .expect("created product id")
}

async fn adjust_stock(
    admin: &Client,
    product_id: i64,
    body: serde_json::Value,
) -> reqwest::Response {
    admin
        .patch(format!(
            "{}/api/products/{product_id}/stock",
            admin_base_url()
        ))
        .json(&body)
        .send()
        .await
        .expect("Failed to adjust stock")
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn increase_then_decrease_round_trips() {
    let admin = client();
    admin_sign_in(&admin).await;
    let product_id = create_product(&admin, 10).await;

    let resp = adjust_stock(
        &admin,
        product_id,
        json!({ "quantity": 5, "operation": "increase" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["stock"], 15);

    let resp = adjust_stock(
        &admin,
        product_id,
        json!({ "quantity": 5, "operation": "decrease" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["stock"], 10);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn decrease_below_zero_is_rejected_and_stock_unchanged() {
    let admin = client();
    admin_sign_in(&admin).await;
    let product_id = create_product(&admin, 3).await;

    let resp = adjust_stock(
        &admin,
        product_id,
        json!({ "quantity": 4, "operation": "decrease" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body = json_body(
        admin
            .get(format!("{}/api/products/{product_id}", admin_base_url()))
            .send()
            .await
            .expect("Failed to get product"),
    )
    .await;
    assert_eq!(body["product"]["stock"], 3);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn non_positive_quantity_is_rejected() {
    let admin = client();
    admin_sign_in(&admin).await;
    let product_id = create_product(&admin, 3).await;

    let resp = adjust_stock(
        &admin,
        product_id,
        json!({ "quantity": 0, "operation": "increase" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
