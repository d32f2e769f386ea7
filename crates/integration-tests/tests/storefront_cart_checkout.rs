//! Integration tests for carts and checkout.
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
use serde_json::{Value, json};

/// Create a published product with a known stock level through the admin
/// API, returning its id.
async fn create_product(stock: i32) -> i64 {
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

    let resp = admin
        .post(format!("{base}/api/products"))
        .json(&json!({
            "name": format!("Checkout Test Figure {}", uuid::Uuid::new_v4().simple()),
            "description": "Created by the checkout integration test.",
            "price": "19.99",
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

/// Current stock of a product, via the admin API.
async fn product_stock(product_id: i64) -> i64 {
    let admin = client();
    admin_sign_in(&admin).await;

    let body = json_body(
        admin
            .get(format!("{}/api/products/{product_id}", admin_base_url()))
            .send()
            .await
            .expect("Failed to get product"),
    )
    .await;
    body["product"]["stock"].as_i64().expect("stock")
}

async fn add_to_cart(client: &Client, product_id: i64, quantity: i64) -> reqwest::Response {
    client
        .post(format!("{}/api/cart/items", storefront_base_url()))
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to add to cart")
}

async fn place_order(client: &Client) -> reqwest::Response {
    client
        .post(format!("{}/api/checkout", storefront_base_url()))
        .json(&json!({
            "shippingAddress": {
                "fullName": "Integration Shopper",
                "line1": "1 Test Street",
                "city": "Testville",
                "postalCode": "12345",
                "country": "US",
            }
        }))
        .send()
        .await
        .expect("Failed to place order")
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn guest_cart_add_update_remove() {
    let product_id = create_product(10).await;
    let shopper = client();
    let base = storefront_base_url();

    // Add two units
    let body = json_body(add_to_cart(&shopper, product_id, 2).await).await;
    let line = find_line(&body["cart"], product_id).expect("line present after add");
    assert_eq!(line["quantity"], 2);

    // Set quantity to five
    let resp = shopper
        .put(format!("{base}/api/cart/items/{product_id}"))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .expect("Failed to update quantity");
    let body = json_body(resp).await;
    assert_eq!(
        find_line(&body["cart"], product_id).expect("line present")["quantity"],
        5
    );

    // Remove the line
    let resp = shopper
        .delete(format!("{base}/api/cart/items/{product_id}"))
        .send()
        .await
        .expect("Failed to remove line");
    let body = json_body(resp).await;
    assert!(find_line(&body["cart"], product_id).is_none());
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn adding_more_than_stock_is_rejected() {
    let product_id = create_product(3).await;
    let shopper = client();

    let resp = add_to_cart(&shopper, product_id, 4).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert!(
        body["error"].as_str().unwrap_or_default().contains("stock"),
        "error should mention stock: {body}"
    );
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn guest_checkout_creates_an_order_without_a_user() {
    let product_id = create_product(5).await;
    let shopper = client();

    assert_eq!(add_to_cart(&shopper, product_id, 2).await.status(), StatusCode::OK);

    let resp = place_order(&shopper).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = json_body(resp).await["order"].clone();
    assert!(order["userId"].is_null(), "guest order should carry no user");
    assert_eq!(order["status"], "pending");

    assert_eq!(product_stock(product_id).await, 3);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn checkout_decrements_stock_and_empties_cart() {
    let product_id = create_product(5).await;
    let shopper = client();
    register_customer(&shopper).await;

    add_to_cart(&shopper, product_id, 2).await;

    let resp = place_order(&shopper).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    let order = &body["order"];
    assert!(
        order["orderNumber"]
            .as_str()
            .unwrap_or_default()
            .starts_with("AM-")
    );
    assert_eq!(order["status"], "pending");

    assert_eq!(product_stock(product_id).await, 3);

    // Cart is now empty
    let cart = json_body(
        shopper
            .get(format!("{}/api/cart", storefront_base_url()))
            .send()
            .await
            .expect("Failed to get cart"),
    )
    .await;
    assert_eq!(cart["cart"]["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn cancelling_a_pending_order_restocks() {
    let product_id = create_product(5).await;
    let shopper = client();
    register_customer(&shopper).await;

    add_to_cart(&shopper, product_id, 3).await;
    let order = json_body(place_order(&shopper).await).await;
    let order_id = order["order"]["id"].as_i64().expect("order id");
    assert_eq!(product_stock(product_id).await, 2);

    let resp = shopper
        .post(format!(
            "{}/api/account/orders/{order_id}/cancel",
            storefront_base_url()
        ))
        .send()
        .await
        .expect("Failed to cancel order");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["order"]["status"], "cancelled");

    assert_eq!(product_stock(product_id).await, 5);
}

fn find_line(cart: &Value, product_id: i64) -> Option<&Value> {
    cart["items"]
        .as_array()?
        .iter()
        .find(|line| line["productId"].as_i64() == Some(product_id))
}
