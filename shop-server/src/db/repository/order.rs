//! Order Repository

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderStatus, PaymentStatus};
use sqlx::{Sqlite, SqlitePool, Transaction};

const ORDER_SELECT: &str = "SELECT id, user_id, name, mobile, address, payment, payment_proof, items, delivery_charge, total_amount, status, payment_status, admin_response, created_at, updated_at FROM orders";

/// Insert a fully built order inside the placement transaction
pub async fn insert(tx: &mut Transaction<'_, Sqlite>, order: &Order) -> RepoResult<()> {
    let items = serde_json::to_string(&order.items)
        .map_err(|e| RepoError::Database(format!("Failed to encode order items: {e}")))?;
    sqlx::query(
        "INSERT INTO orders (id, user_id, name, mobile, address, payment, payment_proof, items, delivery_charge, total_amount, status, payment_status, admin_response, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(&order.name)
    .bind(&order.mobile)
    .bind(&order.address)
    .bind(order.payment)
    .bind(&order.payment_proof)
    .bind(items)
    .bind(order.delivery_charge)
    .bind(order.total_amount)
    .bind(order.status)
    .bind(order.payment_status)
    .bind(&order.admin_response)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// A user's orders, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// One page of all orders, newest first
pub async fn find_page(pool: &SqlitePool, offset: i64, limit: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = ?")
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Σ total_amount over orders with `status`
pub async fn total_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<f64> {
    let total = sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(SUM(total_amount), 0.0) FROM orders WHERE status = ?",
    )
    .bind(status)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Set the lifecycle status, and the admin response when given
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: OrderStatus,
    admin_response: Option<&str>,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, admin_response = COALESCE(?2, admin_response), updated_at = ?3 WHERE id = ?4",
    )
    .bind(status)
    .bind(admin_response)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    reload(pool, id, rows.rows_affected()).await
}

pub async fn update_payment_status(
    pool: &SqlitePool,
    id: i64,
    payment_status: PaymentStatus,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let rows =
        sqlx::query("UPDATE orders SET payment_status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(payment_status)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await?;
    reload(pool, id, rows.rows_affected()).await
}

/// Set payment status and lifecycle status together
pub async fn update_payment_and_status(
    pool: &SqlitePool,
    id: i64,
    payment_status: PaymentStatus,
    status: OrderStatus,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET payment_status = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(payment_status)
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    reload(pool, id, rows.rows_affected()).await
}

async fn reload(pool: &SqlitePool, id: i64, rows_affected: u64) -> RepoResult<Order> {
    if rows_affected == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}
