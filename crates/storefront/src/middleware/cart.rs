//! Cart token extractor.
//!
//! Every visitor, signed in or not, gets an opaque cart token stored in
//! their session on first use. The token keys the cart row, so guest carts
//! survive until the session expires.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::models::session::keys;

/// Extractor yielding the session's cart token, minting one on first use.
pub struct CartToken(pub String);

impl<S> FromRequestParts<S> for CartToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        if let Ok(Some(token)) = session.get::<String>(keys::CART_TOKEN).await {
            return Ok(Self(token));
        }

        let token = Uuid::new_v4().to_string();
        session
            .insert(keys::CART_TOKEN, &token)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        Ok(Self(token))
    }
}
