//! Integration tests for storefront catalog browsing.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//! - The storefront server running (cargo run -p animart-storefront)
//!
//! Run with: cargo test -p animart-integration-tests -- --ignored

use animart_integration_tests::{client, json_body, storefront_base_url};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn product_listing_returns_pagination_metadata() {
    let client = client();
    let resp = client
        .get(format!("{}/api/products?limit=2", storefront_base_url()))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;

    let products = body["products"].as_array().expect("products array");
    assert!(products.len() <= 2);

    let pagination = &body["pagination"];
    assert!(pagination["total"].is_number());
    assert_eq!(pagination["page"], 1);
    assert_eq!(pagination["limit"], 2);
    assert!(pagination["totalPages"].is_number());
    assert!(pagination["hasNextPage"].is_boolean());
    assert_eq!(pagination["hasPrevPage"], false);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn product_detail_by_slug() {
    let client = client();
    let base = storefront_base_url();

    // Grab any published product from the listing first
    let listing = json_body(
        client
            .get(format!("{base}/api/products?limit=1"))
            .send()
            .await
            .expect("Failed to list products"),
    )
    .await;
    let slug = listing["products"][0]["slug"]
        .as_str()
        .expect("seeded product slug");

    let resp = client
        .get(format!("{base}/api/products/{slug}"))
        .send()
        .await
        .expect("Failed to get product");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let product = &body["product"];
    assert_eq!(product["slug"], slug);
    assert!(product["price"].is_string(), "prices serialize as strings");
    assert!(product["category"]["name"].is_string());
    assert!(product["stockStatus"].is_string());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn unknown_product_slug_is_404() {
    let client = client();
    let resp = client
        .get(format!(
            "{}/api/products/definitely-not-a-product",
            storefront_base_url()
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = json_body(resp).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn category_listing_and_detail() {
    let client = client();
    let base = storefront_base_url();

    let listing = json_body(
        client
            .get(format!("{base}/api/categories"))
            .send()
            .await
            .expect("Failed to list categories"),
    )
    .await;
    let categories = listing["categories"].as_array().expect("categories array");
    assert!(!categories.is_empty(), "seed data should include categories");

    let slug = categories[0]["slug"].as_str().expect("category slug");
    let detail = json_body(
        client
            .get(format!("{base}/api/categories/{slug}"))
            .send()
            .await
            .expect("Failed to get category"),
    )
    .await;
    assert_eq!(detail["category"]["slug"], slug);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn search_filters_the_listing() {
    let client = client();
    let body = json_body(
        client
            .get(format!(
                "{}/api/products?search=zzzz-no-such-product",
                storefront_base_url()
            ))
            .send()
            .await
            .expect("Failed to search products"),
    )
    .await;

    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["products"].as_array().map(Vec::len), Some(0));
}
