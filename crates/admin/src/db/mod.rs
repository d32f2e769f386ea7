//! Database operations for the admin panel.
//!
//! Shares the `shop` schema with the storefront binary; the admin side is
//! the only writer for catalog and fulfillment data.

pub mod analytics;
pub mod customers;
pub mod orders;
pub mod products;
pub mod taxonomy;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use analytics::{
    AnalyticsRepository, CategoryRevenue, DailySales, DailySignups, LowStockProduct,
    SalesSummary, StatusBreakdown, TopProduct,
};
pub use customers::CustomerRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use taxonomy::TaxonomyRepository;

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

    /// Constraint violation (duplicate slug, illegal transition, in-use row).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A stock adjustment would have taken a product below zero.
    #[error("{0}")]
    InsufficientStock(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
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
