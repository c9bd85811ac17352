//! Line-item validation and order totals
//!
//! Totals are summed in `Decimal` and rounded to 2 places on the way out.

use super::OrderError;
use rust_decimal::Decimal;
use shared::ErrorCode;
use shared::models::{DELIVERY_CHARGE, OrderItem};
use shared::money::{to_decimal, to_f64};

/// Maximum allowed unit price
const MAX_PRICE: f64 = 10_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i64 = 9999;

/// Validate one requested line before any stock is touched
pub fn validate_line_item(item: &OrderItem) -> Result<(), OrderError> {
    let invalid = |msg: String| OrderError::invalid(ErrorCode::InvalidOrderItems, msg);

    if item.name.trim().is_empty() {
        return Err(invalid(format!(
            "item {} must have a name",
            item.product_id
        )));
    }
    if !item.price.is_finite() || item.price < 0.0 {
        return Err(invalid(format!(
            "price of {} must be a non-negative number, got {}",
            item.name, item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(invalid(format!(
            "price of {} exceeds maximum allowed ({MAX_PRICE})",
            item.name
        )));
    }
    if item.quantity < 1 {
        return Err(invalid(format!(
            "quantity of {} must be at least 1, got {}",
            item.name, item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(invalid(format!(
            "quantity of {} exceeds maximum allowed ({MAX_QUANTITY})",
            item.name
        )));
    }
    Ok(())
}

/// Σ price × quantity
pub fn subtotal(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| to_decimal(item.price) * Decimal::from(item.quantity))
        .sum()
}

/// Subtotal plus the fixed delivery charge, rounded to 2 places
pub fn order_total(items: &[OrderItem]) -> f64 {
    to_f64(subtotal(items) + to_decimal(DELIVERY_CHARGE))
}
