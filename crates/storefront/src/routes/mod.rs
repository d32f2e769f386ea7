//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (pings the database)
//!
//! # Catalog
//! GET  /api/products                   - Product listing (filters, search, sort)
//! GET  /api/products/{slug}            - Product detail
//! GET  /api/categories                 - Category listing
//! GET  /api/categories/{slug}          - Category detail with children
//! GET  /api/animes                     - Anime series listing
//!
//! # Cart (session-scoped, works for guests)
//! GET    /api/cart                     - Current cart
//! POST   /api/cart/items               - Add item
//! PUT    /api/cart/items/{productId}   - Set line quantity (0 removes)
//! DELETE /api/cart/items/{productId}   - Remove line
//! DELETE /api/cart                     - Clear cart
//!
//! # Auth (rate limited)
//! POST /api/auth/register              - Create account
//! POST /api/auth/login                 - Sign in
//! POST /api/auth/logout                - Sign out
//!
//! # Checkout (guests welcome)
//! POST /api/checkout                   - Place order from cart
//!
//! # Account (requires auth)
//! GET  /api/account                    - Profile
//! GET  /api/account/orders             - Order history
//! GET  /api/account/orders/{id}        - Order detail
//! POST /api/account/orders/{id}/cancel - Cancel an unshipped order
//! GET    /api/account/wishlist         - Wishlist
//! POST   /api/account/wishlist/{productId}   - Add to wishlist
//! DELETE /api/account/wishlist/{productId}   - Remove from wishlist
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/categories", get(categories::index))
        .route("/categories/{slug}", get(categories::show))
        .route("/animes", get(categories::animes))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/items", post(cart::add))
        .route(
            "/cart/items/{product_id}",
            put(cart::update).delete(cart::remove),
        )
}

/// Create the auth routes router, with its rate limiter attached.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account", get(account::profile))
        .route("/account/orders", get(account::orders))
        .route("/account/orders/{id}", get(account::order_detail))
        .route("/account/orders/{id}/cancel", post(account::cancel_order))
        .route("/account/wishlist", get(account::wishlist))
        .route(
            "/account/wishlist/{product_id}",
            post(account::wishlist_add).delete(account::wishlist_remove),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .merge(catalog_routes())
            .merge(cart_routes())
            .merge(auth_routes())
            .merge(account_routes())
            .route("/checkout", post(checkout::place_order)),
    )
}
