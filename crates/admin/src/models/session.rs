//! Session-related types.

use serde::{Deserialize, Serialize};

use animart_core::{Email, UserId};

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: UserId,
    /// Admin's email address.
    pub email: Email,
}

/// Session keys for admin authentication state.
pub mod keys {
    /// Key for storing the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
