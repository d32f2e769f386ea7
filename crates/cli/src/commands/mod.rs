//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

/// Connect to the database named by `DATABASE_URL`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the variable is missing or the connection
/// cannot be established.
pub(crate) async fn connect() -> Result<sqlx::PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| "Missing environment variable: DATABASE_URL")?;

    Ok(sqlx::PgPool::connect(&database_url).await?)
}
