//! Session-related types.
//!
//! Types stored in the session for authentication state. The session cookie
//! itself is signed and stored server-side (Postgres); clients never see a
//! raw user id as a credential.

use serde::{Deserialize, Serialize};

use animart_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys for authentication and cart data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the guest cart token.
    pub const CART_TOKEN: &str = "cart_token";
}
