//! Statistics Repository
//!
//! Aggregations over order items, filtered by the parent order's
//! `created_at`. Bounds are Unix millis, half-open `[start, end)`; callers
//! convert calendar dates with `utils::time`.

use std::collections::BTreeMap;

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::ErrorCode;
use shared::models::{DailySales, FoodSalesStat, OrderStatistics, UserOrderedFood};
use sqlx::SqlitePool;

/// Per-food quantity and revenue. `None` bounds are open.
pub async fn food_sales(
    pool: &SqlitePool,
    start: Option<i64>,
    end: Option<i64>,
) -> RepoResult<Vec<FoodSalesStat>> {
    let rows = sqlx::query_as::<_, FoodSalesStat>(
        "SELECT f.id AS food_id, f.full_name AS food_name, f.category AS category, \
         SUM(oi.quantity) AS total_quantity, SUM(oi.quantity * oi.price) AS total_revenue \
         FROM order_items oi \
         JOIN orders o ON o.id = oi.order_id \
         JOIN foods f ON f.id = oi.food_id \
         WHERE (?1 IS NULL OR o.created_at >= ?1) AND (?2 IS NULL OR o.created_at < ?2) \
         GROUP BY f.id, f.full_name, f.category \
         ORDER BY total_revenue DESC, f.full_name",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sum of 64-bit amounts; overflow is an error, never a wrap
pub fn checked_sum<I>(values: I) -> RepoResult<i64>
where
    I: IntoIterator<Item = i64>,
{
    values
        .into_iter()
        .try_fold(0_i64, i64::checked_add)
        .ok_or_else(|| {
            RepoError::Business(
                ErrorCode::ValueOutOfRange,
                "Total exceeds the 64-bit range".into(),
            )
        })
}

/// Attach range and grand totals to per-food rows
pub fn summarize(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    foods: Vec<FoodSalesStat>,
) -> RepoResult<OrderStatistics> {
    let total_quantity = checked_sum(foods.iter().map(|f| f.total_quantity))?;
    let total_revenue = checked_sum(foods.iter().map(|f| f.total_revenue))?;
    Ok(OrderStatistics {
        from,
        to,
        foods,
        total_quantity,
        total_revenue,
    })
}

/// Revenue and order count per calendar day in `tz`
pub async fn daily_sales(
    pool: &SqlitePool,
    start: Option<i64>,
    end: Option<i64>,
    tz: Tz,
) -> RepoResult<Vec<DailySales>> {
    let rows: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT created_at, total_amount FROM orders \
         WHERE (?1 IS NULL OR created_at >= ?1) AND (?2 IS NULL OR created_at < ?2) \
         ORDER BY created_at",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut buckets: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for (created_at, total_amount) in rows {
        let Some(instant) = chrono::DateTime::from_timestamp_millis(created_at) else {
            tracing::warn!(created_at, "Skipping order with out-of-range timestamp");
            continue;
        };
        let day = instant.with_timezone(&tz).date_naive();
        let bucket = buckets.entry(day).or_insert((0, 0));
        bucket.0 = checked_sum([bucket.0, total_amount])?;
        bucket.1 += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|(date, (total_revenue, total_orders))| DailySales {
            date,
            total_revenue,
            total_orders,
        })
        .collect())
}

/// What one user ordered between the bounds, one row per (food, unit price)
pub async fn user_ordered_food(
    pool: &SqlitePool,
    user_id: i64,
    start: i64,
    end: i64,
) -> RepoResult<Vec<UserOrderedFood>> {
    let rows = sqlx::query_as::<_, UserOrderedFood>(
        "SELECT f.id AS food_id, f.full_name AS food_name, f.category AS category, oi.price AS price, \
         SUM(oi.quantity) AS quantity, SUM(oi.quantity * oi.price) AS total_amount \
         FROM order_items oi \
         JOIN orders o ON o.id = oi.order_id \
         JOIN foods f ON f.id = oi.food_id \
         WHERE o.user_id = ?1 AND o.created_at >= ?2 AND o.created_at < ?3 \
         GROUP BY f.id, f.full_name, f.category, oi.price \
         ORDER BY f.full_name, oi.price",
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
