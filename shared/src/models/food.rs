//! Food Model

use serde::{Deserialize, Serialize};

/// Conventional categories; stored upper-cased but not restricted to these
pub const CATEGORY_SOUP: &str = "SOUP";
pub const CATEGORY_MAIN_COURSE: &str = "MAIN_COURSE";

/// Catalog food entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Food {
    pub id: i64,
    pub full_name: String,
    pub description: String,
    pub category: String,
    /// Allergen labels, normalized as a sorted set
    #[cfg_attr(feature = "db", sqlx(json))]
    pub allergens: Vec<String>,
    /// Unit price in whole currency units
    pub price: i64,
    pub image_url: Option<String>,
    pub created_at: i64,
}

/// Create food payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodCreate {
    pub full_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub allergens: Option<Vec<String>>,
    pub price: i64,
    /// CDN path or absolute URL
    pub image_path: Option<String>,
}

/// Update food payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodUpdate {
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub allergens: Option<Vec<String>>,
    pub price: Option<i64>,
    pub image_path: Option<String>,
}
