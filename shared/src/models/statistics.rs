//! Statistics Models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-food sales totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FoodSalesStat {
    pub food_id: i64,
    pub food_name: String,
    pub category: String,
    pub total_quantity: i64,
    pub total_revenue: i64,
}

/// Sales statistics over a date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatistics {
    /// None when the range is open (all time)
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub foods: Vec<FoodSalesStat>,
    pub total_quantity: i64,
    pub total_revenue: i64,
}

/// One bucket of the daily sales chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total_revenue: i64,
    pub total_orders: i64,
}

/// What a user ordered of one food on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserOrderedFood {
    pub food_id: i64,
    pub food_name: String,
    pub category: String,
    /// Unit price frozen at order time
    pub price: i64,
    pub quantity: i64,
    pub total_amount: i64,
}
