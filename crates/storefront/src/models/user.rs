//! Customer account model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use animart_core::{Email, UserId, UserRole};

/// A customer account.
///
/// The password hash lives only in the `users` repository and is never part
/// of this struct, so it cannot leak through a serialized response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub loyalty_points: i32,
    pub total_spent: Decimal,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_trims() {
        let user = User {
            id: UserId::new(1),
            email: Email::parse("rei@example.com").expect("valid email"),
            first_name: "Rei".to_string(),
            last_name: String::new(),
            role: UserRole::User,
            is_active: true,
            loyalty_points: 0,
            total_spent: Decimal::ZERO,
            last_login_at: None,
            created_at: Utc::now(),
        };
        assert_eq!(user.display_name(), "Rei");
    }
}
