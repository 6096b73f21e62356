//! Order Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Order status; orders are created PENDING and no transition is defined
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    Pending,
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    /// Sum of quantity x frozen unit price over all items
    pub total_amount: i64,
    pub status: OrderStatus,
    /// Menu date the order was placed for
    pub menu_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line with the unit price frozen at order time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub food_id: i64,
    pub quantity: i64,
    pub price: i64,
}

/// Order together with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Requested order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub food_id: i64,
    pub quantity: i64,
}

/// Create order payload
///
/// `total_amount` is optional; when present it must equal the total the
/// server computes from current catalog prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
    pub total_amount: Option<i64>,
    /// Canonical YYYY-MM-DD menu date, stored as `menu_date`.
    ///
    /// Per-day views (`/api/orders/mine`, order-proof scans, statistics)
    /// bucket by the order's `created_at` day, not by this date: a
    /// pre-order placed today for tomorrow's menu shows up under today.
    pub date: String,
}
