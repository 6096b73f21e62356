//! Daily Menu Model

use super::food::Food;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The set of foods offered on one calendar date (at most one per date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DailyMenu {
    pub id: i64,
    pub date: NaiveDate,
    pub created_at: i64,
}

/// A daily menu joined with its foods; `foods` may be empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMenuWithFoods {
    pub id: i64,
    pub date: NaiveDate,
    pub foods: Vec<Food>,
}

/// Outcome of adding or removing a food on a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuFoodChange {
    /// None when a removal found no menu for the date
    pub daily_menu_id: Option<i64>,
    pub food_id: i64,
    /// false when the call was a no-op (already present / not present)
    pub changed: bool,
}
