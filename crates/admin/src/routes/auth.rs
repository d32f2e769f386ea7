//! Authentication route handlers.
//!
//! Admin sign-in reuses the customer account table: only accounts with the
//! admin role may sign in here, and suspended accounts are rejected even
//! when the password matches.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use animart_core::{Email, UserRole};

use crate::db::CustomerRepository;
use crate::error::AppError;
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::session::CurrentAdmin;
use crate::state::AppState;

/// Request body for sign-in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign in with email and password.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for bad credentials, a non-admin
/// account, or a suspended account.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let email = Email::parse(&body.email)
        .map_err(|_| AppError::Unauthorized("invalid credentials".to_owned()))?;

    let credentials = CustomerRepository::new(state.pool())
        .get_credentials(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_owned()))?;

    if !verify_password(&body.password, &credentials.password_hash) {
        return Err(AppError::Unauthorized("invalid credentials".to_owned()));
    }
    if credentials.role != UserRole::Admin {
        return Err(AppError::Unauthorized("invalid credentials".to_owned()));
    }
    if !credentials.is_active {
        return Err(AppError::Unauthorized("account is suspended".to_owned()));
    }

    // A fresh session id on privilege change
    session.cycle_id().await.map_err(|e| {
        tracing::error!(error = %e, "failed to cycle session id");
        AppError::Internal("session error".to_owned())
    })?;

    let admin = CurrentAdmin {
        id: credentials.id,
        email: credentials.email,
    };
    set_current_admin(&session, &admin).await.map_err(|e| {
        tracing::error!(error = %e, "failed to store admin session");
        AppError::Internal("session error".to_owned())
    })?;

    tracing::info!(admin_id = %admin.id, "admin signed in");

    Ok(Json(json!({ "admin": admin })))
}

/// Sign out the current administrator.
///
/// # Errors
///
/// Returns `AppError::Internal` if the session cannot be cleared.
pub async fn logout(session: Session) -> Result<Json<Value>, AppError> {
    clear_current_admin(&session).await.map_err(|e| {
        tracing::error!(error = %e, "failed to clear admin session");
        AppError::Internal("session error".to_owned())
    })?;

    Ok(Json(json!({ "message": "signed out" })))
}

/// Return the signed-in administrator.
pub async fn me(RequireAdmin(admin): RequireAdmin) -> Json<Value> {
    Json(json!({ "admin": admin }))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
