//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed delivery fee added to every order's subtotal
pub const DELIVERY_CHARGE: f64 = 200.0;

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum PaymentMethod {
    #[serde(rename = "Cash on Delivery")]
    #[cfg_attr(feature = "db", sqlx(rename = "Cash on Delivery"))]
    CashOnDelivery,
    JazzCash,
    #[serde(rename = "Bank Transfer")]
    #[cfg_attr(feature = "db", sqlx(rename = "Bank Transfer"))]
    BankTransfer,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::JazzCash => "JazzCash",
            Self::BankTransfer => "Bank Transfer",
        }
    }

    /// Payment status a freshly placed order starts with.
    ///
    /// Cash on delivery needs no proof review; everything else waits for an admin.
    pub const fn initial_status(&self) -> PaymentStatus {
        match self {
            Self::CashOnDelivery => PaymentStatus::Verified,
            Self::JazzCash | Self::BankTransfer => PaymentStatus::Unverified,
        }
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum OrderStatus {
    Pending,
    Approved,
    InProgress,
    Delivered,
    Rejected,
    /// Set by the verify-payment shortcut
    Confirmed,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::InProgress => "in-progress",
            Self::Delivered => "delivered",
            Self::Rejected => "rejected",
            Self::Confirmed => "confirmed",
        }
    }
}

/// Payment verification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum PaymentStatus {
    Unverified,
    Verified,
    Rejected,
    Pending,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }
}

/// Error returned when a string is not one of an enum's wire values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! impl_wire_enum {
    ($ty:ty, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant(s.to_string()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_wire_enum!(
    PaymentMethod,
    [
        PaymentMethod::CashOnDelivery,
        PaymentMethod::JazzCash,
        PaymentMethod::BankTransfer,
    ]
);
impl_wire_enum!(
    OrderStatus,
    [
        OrderStatus::Pending,
        OrderStatus::Approved,
        OrderStatus::InProgress,
        OrderStatus::Delivered,
        OrderStatus::Rejected,
        OrderStatus::Confirmed,
    ]
);
impl_wire_enum!(
    PaymentStatus,
    [
        PaymentStatus::Unverified,
        PaymentStatus::Verified,
        PaymentStatus::Rejected,
        PaymentStatus::Pending,
    ]
);

/// One line of an order: a frozen snapshot of what was bought
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: i64,
    pub name: String,
    /// Unit price as shown to the customer
    pub price: f64,
    pub quantity: i64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub mobile: String,
    pub address: String,
    pub payment: PaymentMethod,
    /// Relative URL under `/uploads/payments/`
    pub payment_proof: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderItem>,
    pub delivery_charge: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub admin_response: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Admin status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub status: String,
    pub admin_response: Option<String>,
}

/// Admin payment status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    pub payment_status: String,
}

/// Page of orders for the admin list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_orders: i64,
    pub orders_per_page: i64,
}

impl Pagination {
    pub fn new(current_page: i64, orders_per_page: i64, total_orders: i64) -> Self {
        let total_pages = if orders_per_page > 0 {
            (total_orders + orders_per_page - 1) / orders_per_page
        } else {
            0
        };
        Self {
            current_page,
            total_pages,
            total_orders,
            orders_per_page,
        }
    }
}
