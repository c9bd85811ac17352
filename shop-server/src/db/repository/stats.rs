//! Admin dashboard aggregates

use super::{RepoResult, order, product};
use shared::models::{AdminStats, LOW_STOCK_THRESHOLD, OrderStatus};
use sqlx::SqlitePool;

pub async fn admin_stats(pool: &SqlitePool) -> RepoResult<AdminStats> {
    Ok(AdminStats {
        products_count: product::count_active(pool).await?,
        orders_count: order::count(pool).await?,
        pending_orders: order::count_by_status(pool, OrderStatus::Pending).await?,
        confirmed_orders: order::count_by_status(pool, OrderStatus::Confirmed).await?,
        total_sales: shared::money::to_f64(shared::money::to_decimal(
            order::total_by_status(pool, OrderStatus::Confirmed).await?,
        )),
        low_stock: product::low_stock(pool, LOW_STOCK_THRESHOLD).await?,
    })
}
