//! Admin view of customer accounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use animart_core::{Email, UserId, UserRole};

/// A customer account with order aggregates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub loyalty_points: i32,
    pub total_spent: Decimal,
    /// Lifetime order count, computed at query time.
    pub orders_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One entry in a customer's activity feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerActivity {
    /// One of `registration`, `login`, `order`, `wishlist`.
    pub kind: String,
    pub at: DateTime<Utc>,
    /// Order number or product name, depending on the kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<crate::db::customers::ActivityEvent> for CustomerActivity {
    fn from(event: crate::db::customers::ActivityEvent) -> Self {
        Self {
            kind: event.kind,
            at: event.at,
            detail: event.detail,
        }
    }
}
