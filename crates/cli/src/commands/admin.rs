//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! animart-cli admin create -e admin@example.com -p 'a long password'
//! ```
//!
//! Admin accounts live in the same table as customers, with `role = 'admin'`.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use thiserror::Error;

use animart_core::Email;

/// Minimum password length for admin accounts.
const MIN_PASSWORD_LENGTH: usize = 12;

/// Errors that can occur during admin account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Account already has the admin role.
    #[error("An admin account already exists with email: {0}")]
    AlreadyAdmin(String),

    /// Password hashing error.
    #[error("Failed to hash password")]
    PasswordHash,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a new admin account, or promote an existing customer account.
///
/// A customer with this email is promoted in place: their role becomes
/// `admin` and their password is replaced.
///
/// # Errors
///
/// Returns `AdminError` for an invalid email, a short password, an
/// existing admin with this email, or a database failure.
pub async fn create_account(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<i32, Box<dyn std::error::Error>> {
    let email =
        Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword.into());
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AdminError::PasswordHash)?
        .to_string();

    let pool = super::connect().await?;

    let existing: Option<(i32, String)> =
        sqlx::query_as("SELECT id, role FROM shop.shop_user WHERE email = $1")
            .bind(email.as_str())
            .fetch_optional(&pool)
            .await
            .map_err(AdminError::Database)?;

    if let Some((id, role)) = existing {
        if role == "admin" {
            return Err(AdminError::AlreadyAdmin(email.to_string()).into());
        }

        sqlx::query(
            "UPDATE shop.shop_user SET role = 'admin', password_hash = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(&password_hash)
        .execute(&pool)
        .await
        .map_err(AdminError::Database)?;

        tracing::info!("Promoted existing account to admin. ID: {}, Email: {}", id, email);
        return Ok(id);
    }

    tracing::info!("Creating admin account: {}", email);

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO shop.shop_user (email, password_hash, first_name, last_name, role)
         VALUES ($1, $2, $3, $4, 'admin')
         RETURNING id",
    )
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(&pool)
    .await
    .map_err(AdminError::Database)?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Email: {}",
        user_id,
        email
    );

    Ok(user_id)
}
