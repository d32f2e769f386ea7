//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (pings the database)
//!
//! # Auth
//! POST /api/auth/login                  - Sign in (admin accounts only)
//! POST /api/auth/logout                 - Sign out
//! GET  /api/auth/me                     - Current administrator
//!
//! # Dashboard (all take ?days=7|30|90|365, default 30)
//! GET  /api/dashboard/stats             - KPI block vs the preceding window
//! GET  /api/dashboard/revenue-by-category?limit - Revenue per category
//! GET  /api/dashboard/customer-growth   - Signups per day, zero-filled
//! GET  /api/dashboard/order-status      - Count and revenue per status
//! GET  /api/dashboard/aov-trend         - Mean order value per day
//! GET  /api/dashboard/top-products?limit - Best sellers with live metadata
//! GET  /api/dashboard/low-stock         - Published products running out
//!
//! # Orders
//! GET   /api/orders                     - Order listing (filters, search, per-status summary)
//! GET   /api/orders/{id}                - Order detail
//! PATCH /api/orders/{id}/status         - Advance, cancel, or refund an order
//!
//! # Products
//! GET    /api/products                  - Product listing (all statuses)
//! POST   /api/products                  - Create product
//! GET    /api/products/{id}             - Product detail
//! PUT    /api/products/{id}             - Partial update
//! DELETE /api/products/{id}             - Delete product
//! PATCH  /api/products/{id}/stock       - Adjust stock up or down
//!
//! # Customers
//! GET  /api/customers                   - Customer listing
//! GET  /api/customers/{id}              - Customer detail
//! GET  /api/customers/{id}/activity     - Recent activity feed (capped at 20)
//! POST /api/customers/{id}/suspend      - Suspend account
//! POST /api/customers/{id}/activate     - Reactivate account
//!
//! # Taxonomy
//! GET    /api/categories                - Category listing with product counts
//! POST   /api/categories                - Create category
//! PUT    /api/categories/{id}           - Rename category
//! DELETE /api/categories/{id}           - Delete category (must be unused)
//! GET    /api/animes                    - Anime series listing
//! POST   /api/animes                    - Create anime series
//! DELETE /api/animes/{id}               - Delete anime series
//! ```
//!
//! Everything under `/api` except `/api/auth/login` requires a signed-in
//! administrator; handlers enforce this with the `RequireAdmin` extractor.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod taxonomy;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create all routes for the admin API.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/dashboard/stats", get(dashboard::stats))
        .route(
            "/dashboard/revenue-by-category",
            get(dashboard::revenue_by_category),
        )
        .route("/dashboard/customer-growth", get(dashboard::customer_growth))
        .route("/dashboard/order-status", get(dashboard::order_status))
        .route("/dashboard/aov-trend", get(dashboard::aov_trend))
        .route("/dashboard/top-products", get(dashboard::top_products))
        .route("/dashboard/low-stock", get(dashboard::low_stock))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", patch(orders::update_status))
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/products/{id}/stock", patch(products::adjust_stock))
        .route("/customers", get(customers::index))
        .route("/customers/{id}", get(customers::show))
        .route("/customers/{id}/activity", get(customers::activity))
        .route("/customers/{id}/suspend", post(customers::suspend))
        .route("/customers/{id}/activate", post(customers::activate))
        .route(
            "/categories",
            get(taxonomy::categories).post(taxonomy::create_category),
        )
        .route(
            "/categories/{id}",
            put(taxonomy::update_category).delete(taxonomy::delete_category),
        )
        .route("/animes", get(taxonomy::animes).post(taxonomy::create_anime))
        .route("/animes/{id}", axum::routing::delete(taxonomy::delete_anime));

    Router::new().nest("/api", api)
}
