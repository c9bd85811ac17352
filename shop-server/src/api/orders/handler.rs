//! Order API Handlers

use std::str::FromStr;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use shared::ErrorCode;
use shared::models::{
    Order, OrderPage, OrderStatus, OrderStatusUpdate, Pagination, PaymentStatus,
    PaymentStatusUpdate,
};

use crate::api::form::MultipartForm;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, order};
use crate::orders::{PlaceOrderInput, check_input, parse_items, place_order};
use crate::services::uploads;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{ApiResult, AppError, ok, ok_with_message};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Multipart field carrying the payment screenshot
const PROOF_FIELD: &str = "paymentProof";

fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        .with_detail("orderId", id)
}

fn not_found_as_order(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound(_) => order_not_found(id),
        other => other.into(),
    }
}

/// POST /api/orders/place
///
/// Fields: `name`, `mobile`, `address`, `payment`, `items` (JSON array),
/// optional file `paymentProof`. The input is checked before the proof is
/// stored; the proof is removed again if placement then fails.
pub async fn place(
    State(state): State<ServerState>,
    current: CurrentUser,
    multipart: Multipart,
) -> ApiResult<Order> {
    let mut form = MultipartForm::read(multipart).await?;

    let items = parse_items(form.text("items")?)?;
    let proof = form.take_file(&[PROOF_FIELD]);
    let input = PlaceOrderInput {
        name: form.text("name")?.to_string(),
        mobile: form.text("mobile")?.to_string(),
        address: form.text("address")?.to_string(),
        payment: form.text("payment")?.to_string(),
        items,
        payment_proof: None,
    };
    check_input(&input)?;

    let uploads_dir = state.uploads_dir();
    let stored = match proof {
        Some(file) => Some(uploads::store_payment_proof(
            &uploads_dir,
            &file.filename,
            &file.data,
        )?),
        None => None,
    };
    let input = PlaceOrderInput {
        payment_proof: stored.as_ref().map(|s| s.url.clone()),
        ..input
    };

    match place_order(state.pool(), current.id, input).await {
        Ok(placed) => Ok(ok_with_message("Order placed successfully", placed)),
        Err(e) => {
            if let Some(stored) = stored {
                uploads::remove_upload(&uploads_dir, &stored.url);
            }
            Err(e.into())
        }
    }
}

/// GET /api/orders/user - the caller's orders, newest first
pub async fn list_mine(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> ApiResult<Vec<Order>> {
    let orders = order::find_by_user(state.pool(), current.id).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    let found = order::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| order_not_found(id))?;

    if found.user_id != current.id && !current.is_admin() {
        crate::security_log!(
            "WARN",
            "order_access_denied",
            user_id = current.id,
            order_id = id
        );
        return Err(AppError::permission_denied("Not your order"));
    }
    Ok(ok(found))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// `(page, limit)` with page >= 1 and limit clamped to 1..=100
    fn resolve(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, limit)
    }
}

/// GET /api/orders/all?page=&limit=
pub async fn list_all(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<OrderPage> {
    let (page, limit) = query.resolve();
    let offset = (page - 1).saturating_mul(limit);

    let orders = order::find_page(state.pool(), offset, limit).await?;
    let total = order::count(state.pool()).await?;

    Ok(ok(OrderPage {
        orders,
        pagination: Pagination::new(page, limit, total),
    }))
}

/// PUT /api/orders/status/{id}
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> ApiResult<Order> {
    let status = OrderStatus::from_str(&payload.status).map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidOrderStatus,
            format!("Invalid order status: {}", e.0),
        )
    })?;
    validate_optional_text(&payload.admin_response, "adminResponse", MAX_NOTE_LEN)?;

    let updated = order::update_status(
        state.pool(),
        id,
        status,
        payload.admin_response.as_deref().map(str::trim),
    )
    .await
    .map_err(not_found_as_order(id))?;

    tracing::info!(order_id = id, status = status.as_str(), "Order status updated");
    Ok(ok_with_message("Order status updated", updated))
}

/// PUT /api/orders/payment-status/{id}
pub async fn update_payment_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentStatusUpdate>,
) -> ApiResult<Order> {
    let payment_status = PaymentStatus::from_str(&payload.payment_status).map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidPaymentStatus,
            format!("Invalid payment status: {}", e.0),
        )
    })?;

    let updated = order::update_payment_status(state.pool(), id, payment_status)
        .await
        .map_err(not_found_as_order(id))?;

    tracing::info!(
        order_id = id,
        payment_status = payment_status.as_str(),
        "Payment status updated"
    );
    Ok(ok_with_message("Payment status updated", updated))
}

/// PUT /api/orders/verify-payment/{id} - verified and confirmed
pub async fn verify_payment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    let updated = order::update_payment_and_status(
        state.pool(),
        id,
        PaymentStatus::Verified,
        OrderStatus::Confirmed,
    )
    .await
    .map_err(not_found_as_order(id))?;

    tracing::info!(order_id = id, "Payment verified");
    Ok(ok_with_message("Payment verified", updated))
}

/// PUT /api/orders/reject-payment/{id} - payment and order rejected
pub async fn reject_payment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    let updated = order::update_payment_and_status(
        state.pool(),
        id,
        PaymentStatus::Rejected,
        OrderStatus::Rejected,
    )
    .await
    .map_err(not_found_as_order(id))?;

    tracing::info!(order_id = id, "Payment rejected");
    Ok(ok_with_message("Payment rejected", updated))
}
