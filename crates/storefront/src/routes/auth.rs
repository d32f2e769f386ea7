//! Authentication route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::db::CartRepository;
use crate::error::AppError;
use crate::middleware::{CartToken, clear_current_user, set_current_user};
use crate::models::session::CurrentUser;
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Request body for registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Request body for sign-in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Create an account and sign the new customer in.
///
/// # Errors
///
/// Returns `AppError::Auth` for invalid email, weak password, or an already
/// registered address.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    cart_token: CartToken,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = AuthService::new(state.pool())
        .register(&body.email, &body.password, &body.first_name, &body.last_name)
        .await?;

    establish_session(&state, &session, cart_token, &user).await?;

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// Sign in with email and password.
///
/// # Errors
///
/// Returns `AppError::Auth` for bad credentials or a suspended account.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    cart_token: CartToken,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    establish_session(&state, &session, cart_token, &user).await?;

    Ok(Json(json!({ "user": user })))
}

/// Sign out.
///
/// # Errors
///
/// Returns `AppError::Internal` if the session cannot be updated.
pub async fn logout(session: Session) -> Result<Json<Value>, AppError> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    crate::error::clear_sentry_user();

    Ok(Json(json!({ "ok": true })))
}

/// Rotate the session id, store the signed-in user, and attach the session's
/// guest cart to them.
async fn establish_session(
    state: &AppState,
    session: &Session,
    CartToken(cart_token): CartToken,
    user: &User,
) -> Result<(), AppError> {
    // New session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    set_current_user(
        session,
        &CurrentUser {
            id: user.id,
            email: user.email.clone(),
        },
    )
    .await
    .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    let carts = CartRepository::new(state.pool());
    let cart_id = carts.find_or_create(&cart_token).await?;
    carts.attach_user(cart_id, user.id).await?;

    crate::error::set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(())
}
