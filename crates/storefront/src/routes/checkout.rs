//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::{CartRepository, OrderRepository};
use crate::error::AppError;
use crate::middleware::{CartToken, OptionalUser};
use crate::models::order::ShippingAddress;
use crate::state::AppState;

/// Request body for placing an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
}

/// Place an order from the session's cart.
///
/// Works for guests too: a guest order carries no user reference, and the
/// loyalty bookkeeping is skipped. Stock is taken atomically inside the
/// order transaction: if any line cannot be covered the whole checkout
/// fails with a 409 and nothing is decremented.
///
/// # Errors
///
/// - `AppError::Validation` if the shipping address is incomplete.
/// - `AppError::Conflict` if the cart is empty or stock is insufficient.
pub async fn place_order(
    State(state): State<AppState>,
    OptionalUser(current): OptionalUser,
    CartToken(token): CartToken,
    Json(body): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    validate_address(&body.shipping_address)?;

    let cart_id = CartRepository::new(state.pool())
        .find_or_create(&token)
        .await?;

    let order = OrderRepository::new(state.pool())
        .create_from_cart(current.map(|u| u.id), cart_id, &body.shipping_address)
        .await?;

    tracing::info!(
        order_number = %order.order_number,
        total = %order.total,
        "order placed"
    );

    Ok((StatusCode::CREATED, Json(json!({ "order": order }))))
}

fn validate_address(address: &ShippingAddress) -> Result<(), AppError> {
    let required = [
        ("fullName", &address.full_name),
        ("line1", &address.line1),
        ("city", &address.city),
        ("postalCode", &address.postal_code),
        ("country", &address.country),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "shipping address field '{field}' is required"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Rei Ayanami".to_string(),
            line1: "1-1 Hakone".to_string(),
            line2: None,
            city: "Tokyo-3".to_string(),
            state: None,
            postal_code: "250-0631".to_string(),
            country: "JP".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_complete_address_passes() {
        assert!(validate_address(&address()).is_ok());
    }

    #[test]
    fn test_blank_required_field_rejected() {
        let mut addr = address();
        addr.city = "   ".to_string();
        let err = validate_address(&addr).expect_err("blank city should fail");
        assert!(err.to_string().contains("city"));
    }
}
