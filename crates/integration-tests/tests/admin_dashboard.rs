//! Integration tests for the admin dashboard endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The admin server running, and the admin test account created
//!
//! Run with: cargo test -p animart-integration-tests -- --ignored

use animart_integration_tests::{admin_base_url, admin_sign_in, client, json_body};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn dashboard_requires_admin_session() {
    let anonymous = client();
    let resp = anonymous
        .get(format!("{}/api/dashboard/stats", admin_base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn stats_has_metric_cards() {
    let admin = client();
    admin_sign_in(&admin).await;

    let resp = admin
        .get(format!("{}/api/dashboard/stats?days=7", admin_base_url()))
        .send()
        .await
        .expect("Failed to get stats");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let stats = &body["stats"];

    assert_eq!(stats["days"], 7);
    for card in ["revenue", "orders", "newCustomers", "averageOrderValue"] {
        assert!(stats[card]["value"].is_string(), "{card} value");
        let change = stats[card]["change"].as_str().expect("change string");
        assert!(
            change.ends_with('%'),
            "{card} change should be a percentage: {change}"
        );
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn unknown_window_falls_back_to_thirty_days() {
    let admin = client();
    admin_sign_in(&admin).await;

    let body = json_body(
        admin
            .get(format!("{}/api/dashboard/stats?days=14", admin_base_url()))
            .send()
            .await
            .expect("Failed to get stats"),
    )
    .await;
    assert_eq!(body["stats"]["days"], 30);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn customer_growth_covers_every_day_of_the_window() {
    let admin = client();
    admin_sign_in(&admin).await;

    let body = json_body(
        admin
            .get(format!(
                "{}/api/dashboard/customer-growth?days=7",
                admin_base_url()
            ))
            .send()
            .await
            .expect("Failed to get customer growth"),
    )
    .await;

    assert_eq!(body["days"], 7);
    let growth = body["growth"].as_array().expect("growth series");
    assert_eq!(growth.len(), 7, "one point per day, zero-filled");
    for point in growth {
        assert!(point["date"].is_string());
        assert!(point["signups"].is_number());
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn aov_trend_covers_every_day_of_the_window() {
    let admin = client();
    admin_sign_in(&admin).await;

    let body = json_body(
        admin
            .get(format!("{}/api/dashboard/aov-trend?days=7", admin_base_url()))
            .send()
            .await
            .expect("Failed to get AOV trend"),
    )
    .await;

    let trend = body["trend"].as_array().expect("trend series");
    assert_eq!(trend.len(), 7, "one point per day, zero-filled");
    for point in trend {
        assert!(point["averageOrderValue"].is_string());
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn ranking_endpoints_return_arrays() {
    let admin = client();
    admin_sign_in(&admin).await;

    for (path, key) in [
        ("/api/dashboard/revenue-by-category", "categories"),
        ("/api/dashboard/order-status", "statuses"),
        ("/api/dashboard/top-products", "products"),
        ("/api/dashboard/low-stock", "products"),
    ] {
        let body = json_body(
            admin
                .get(format!("{}{path}", admin_base_url()))
                .send()
                .await
                .expect("Failed to get dashboard endpoint"),
        )
        .await;
        assert!(body[key].is_array(), "{path} should return {key} array");
    }
}
