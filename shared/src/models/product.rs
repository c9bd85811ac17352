//! Product Model

use crate::money::{to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sale settings embedded in a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductSale {
    pub is_on_sale: bool,
    /// 0-100
    pub discount_percentage: f64,
    /// Unix millis, `None` = no lower bound
    pub sale_start_date: Option<i64>,
    /// Unix millis, `None` = no upper bound
    pub sale_end_date: Option<i64>,
}

impl ProductSale {
    /// Whether the sale applies at `now` (Unix millis).
    pub fn is_active_at(&self, now: i64) -> bool {
        self.is_on_sale
            && self.sale_start_date.is_none_or(|start| start <= now)
            && self.sale_end_date.is_none_or(|end| end >= now)
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Canonical name from [`crate::catalog::CATEGORIES`]
    pub category: String,
    pub price: f64,
    pub description: String,
    /// Relative URL under `/uploads/images/`
    pub image: Option<String>,
    pub stock: i64,
    pub is_deleted: bool,
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub sale: ProductSale,
    pub created_at: i64,
    pub updated_at: i64,
    /// Price after an active sale discount, filled in on catalog reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub effective_price: Option<f64>,
}

impl Product {
    /// Price at `now`, with the sale discount applied when the sale is active.
    pub fn effective_price_at(&self, now: i64) -> f64 {
        if !self.sale.is_active_at(now) {
            return self.price;
        }
        let pct = to_decimal(self.sale.discount_percentage.clamp(0.0, 100.0));
        let price = to_decimal(self.price);
        to_f64(price - price * pct / Decimal::ONE_HUNDRED)
    }

    /// Fill in `effective_price` for a catalog response.
    pub fn with_effective_price(mut self, now: i64) -> Self {
        self.effective_price = Some(self.effective_price_at(now));
        self
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub stock: Option<i64>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub stock: Option<i64>,
}

/// Set sale payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleUpdate {
    pub is_on_sale: bool,
    #[serde(default)]
    pub discount_percentage: f64,
    pub sale_start_date: Option<i64>,
    pub sale_end_date: Option<i64>,
}
