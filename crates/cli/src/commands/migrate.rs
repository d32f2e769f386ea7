//! Database migration command.
//!
//! Both binaries share one database and one `shop` schema, so there is a
//! single migration set, embedded at compile time from
//! `crates/cli/migrations/`.
//!
//! ```bash
//! animart-cli migrate
//! ```

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
