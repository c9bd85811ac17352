//! Admin dashboard stats

use super::product::Product;
use serde::{Deserialize, Serialize};

/// Counts shown on the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    /// Non-deleted products
    pub products_count: i64,
    pub orders_count: i64,
    pub pending_orders: i64,
    pub confirmed_orders: i64,
    /// Sum of `total_amount` over confirmed orders
    pub total_sales: f64,
    /// Non-deleted products with fewer than [`LOW_STOCK_THRESHOLD`] units
    pub low_stock: Vec<Product>,
}

pub const LOW_STOCK_THRESHOLD: i64 = 5;
