//! Database operations for the storefront.
//!
//! ## Tables (schema `shop`, shared with the admin binary)
//!
//! - `product`, `category`, `anime` - catalog
//! - `shop_user`, `wishlist_item` - customers
//! - `cart`, `cart_item` - carts (guest carts keyed by session token)
//! - `shop_order`, `order_item` - orders
//! - `storefront_session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations live in `crates/cli/migrations/` and run via:
//! ```bash
//! cargo run -p animart-cli -- migrate
//! ```

pub mod carts;
pub mod orders;
pub mod products;
pub mod taxonomy;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use taxonomy::TaxonomyRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A stock decrement would have taken a product below zero.
    #[error("{0}")]
    InsufficientStock(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// Called once at startup; the pool is then shared process-wide via
/// `AppState`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
