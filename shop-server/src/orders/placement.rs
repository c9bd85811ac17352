//! Order placement
//!
//! Every stock decrement and the order insert run in one transaction.
//! Each decrement is a conditional `UPDATE ... WHERE stock >= ?`, so two
//! placements racing for the same units serialize on SQLite's write lock
//! and the loser sees the reduced stock. Any failure rolls the whole
//! transaction back.

use std::str::FromStr;

use shared::models::{Order, OrderItem, OrderStatus, PaymentMethod, DELIVERY_CHARGE};
use shared::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::OrderError;
use super::money::{order_total, validate_line_item};
use crate::db::repository::{order as order_repo, product as product_repo};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_mobile, validate_text_range,
};

const MIN_NAME_LEN: usize = 2;
const MIN_ADDRESS_LEN: usize = 10;

/// Checkout payload, identity excluded
#[derive(Debug, Clone)]
pub struct PlaceOrderInput {
    pub name: String,
    pub mobile: String,
    pub address: String,
    /// Wire value of a [`PaymentMethod`]
    pub payment: String,
    pub items: Vec<OrderItem>,
    /// Reference of an already stored payment proof
    pub payment_proof: Option<String>,
}

/// Decode the `items` form field (JSON array of line items)
pub fn parse_items(raw: &str) -> Result<Vec<OrderItem>, OrderError> {
    serde_json::from_str::<Vec<OrderItem>>(raw).map_err(|e| {
        OrderError::invalid(
            ErrorCode::InvalidOrderItems,
            format!("items must be a JSON array of {{productId, name, price, quantity}}: {e}"),
        )
    })
}

fn field_error(err: AppError) -> OrderError {
    OrderError::Validation {
        code: err.code,
        message: err.message,
    }
}

/// Validated, normalized checkout data
#[derive(Debug)]
struct Checkout {
    name: String,
    mobile: String,
    address: String,
    payment: PaymentMethod,
}

fn validate(input: &PlaceOrderInput) -> Result<Checkout, OrderError> {
    validate_text_range(&input.name, "name", MIN_NAME_LEN, MAX_NAME_LEN).map_err(field_error)?;
    validate_mobile(&input.mobile).map_err(field_error)?;
    validate_text_range(&input.address, "address", MIN_ADDRESS_LEN, MAX_ADDRESS_LEN)
        .map_err(field_error)?;

    let payment = PaymentMethod::from_str(&input.payment).map_err(|e| {
        OrderError::invalid(
            ErrorCode::PaymentInvalidMethod,
            format!("Invalid payment method: {}", e.0),
        )
    })?;

    if input.items.is_empty() {
        return Err(OrderError::invalid(
            ErrorCode::OrderEmpty,
            "Order must contain at least one item",
        ));
    }
    for item in &input.items {
        validate_line_item(item)?;
    }

    Ok(Checkout {
        name: input.name.trim().to_string(),
        mobile: input.mobile.trim().to_string(),
        address: input.address.trim().to_string(),
        payment,
    })
}

/// Check the checkout fields and line items without touching the database
///
/// Lets callers reject a bad request before storing its payment proof.
pub fn check_input(input: &PlaceOrderInput) -> Result<(), OrderError> {
    validate(input).map(|_| ())
}

/// Place an order for `user_id`
///
/// On success every referenced product's stock is reduced by its quantity
/// and the persisted order is returned. On error nothing has changed.
pub async fn place_order(
    pool: &SqlitePool,
    user_id: i64,
    input: PlaceOrderInput,
) -> Result<Order, OrderError> {
    let checkout = validate(&input)?;

    if checkout.payment != PaymentMethod::CashOnDelivery && input.payment_proof.is_none() {
        tracing::warn!(
            user_id,
            payment = checkout.payment.as_str(),
            "Order placed without payment proof"
        );
    }

    let now = shared::util::now_millis();
    let order = Order {
        id: shared::util::snowflake_id(),
        user_id,
        name: checkout.name,
        mobile: checkout.mobile,
        address: checkout.address,
        payment: checkout.payment,
        payment_proof: input.payment_proof,
        total_amount: order_total(&input.items),
        items: input.items,
        delivery_charge: DELIVERY_CHARGE,
        status: OrderStatus::Pending,
        payment_status: checkout.payment.initial_status(),
        admin_response: String::new(),
        created_at: now,
        updated_at: now,
    };

    let mut tx = pool.begin().await?;
    match reserve_and_insert(&mut tx, &order, now).await {
        Ok(()) => tx.commit().await?,
        Err(e) => {
            if let Err(rb) = tx.rollback().await {
                tracing::error!(error = %rb, "Failed to roll back order placement");
            }
            return Err(e);
        }
    }

    tracing::info!(
        order_id = order.id,
        user_id,
        items = order.items.len(),
        total = order.total_amount,
        payment_status = order.payment_status.as_str(),
        "Order placed"
    );
    Ok(order)
}

async fn reserve_and_insert(
    tx: &mut Transaction<'_, Sqlite>,
    order: &Order,
    now: i64,
) -> Result<(), OrderError> {
    for item in &order.items {
        if product_repo::decrement_stock(tx, item.product_id, item.quantity, now).await? {
            continue;
        }
        return Err(match product_repo::stock_of(tx, item.product_id).await? {
            None => OrderError::ProductNotFound {
                product_id: item.product_id,
                name: item.name.clone(),
            },
            Some(available) => {
                tracing::warn!(
                    product_id = item.product_id,
                    requested = item.quantity,
                    available,
                    "Insufficient stock"
                );
                OrderError::InsufficientStock {
                    product_id: item.product_id,
                    name: item.name.clone(),
                    requested: item.quantity,
                    available,
                }
            }
        });
    }

    order_repo::insert(tx, order).await?;
    Ok(())
}
