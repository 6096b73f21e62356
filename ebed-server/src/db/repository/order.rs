//! Order Repository
//!
//! Orders are written in one transaction: the order row and every item
//! commit together or not at all. Unit prices come from the catalog at
//! write time and are frozen on the item rows.

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::error::ErrorCode;
use shared::models::{Order, OrderDetail, OrderItem, OrderItemInput, OrderStatus};
use sqlx::SqlitePool;

/// Validated order request; `user_id` comes from the request context
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub items: Vec<OrderItemInput>,
    /// Total the client displayed, if it sent one
    pub claimed_total: Option<i64>,
    pub menu_date: NaiveDate,
}

fn check_items(items: &[OrderItemInput]) -> RepoResult<()> {
    if items.is_empty() {
        return Err(RepoError::business(ErrorCode::OrderEmpty));
    }
    if let Some(bad) = items.iter().find(|i| i.quantity < 1) {
        return Err(RepoError::Business(
            ErrorCode::OrderInvalidQuantity,
            format!(
                "Quantity for food {} must be at least 1, got {}",
                bad.food_id, bad.quantity
            ),
        ));
    }
    Ok(())
}

/// Sum of quantity x price with 64-bit overflow detection
pub fn compute_total(lines: &[(i64, i64)]) -> RepoResult<i64> {
    lines
        .iter()
        .try_fold(0_i64, |acc, &(quantity, price)| {
            quantity
                .checked_mul(price)
                .and_then(|line| acc.checked_add(line))
        })
        .ok_or_else(|| RepoError::business(ErrorCode::OrderTotalOverflow))
}

pub async fn create(pool: &SqlitePool, data: NewOrder, now: i64) -> RepoResult<OrderDetail> {
    check_items(&data.items)?;

    let mut tx = super::begin_write(pool).await?;

    let user: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(data.user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if user.is_none() {
        return Err(RepoError::Business(
            ErrorCode::UserNotFound,
            format!("User {} not found", data.user_id),
        ));
    }

    // Current catalog prices, read inside the transaction
    let mut prices: HashMap<i64, i64> = HashMap::new();
    let mut lines: Vec<(i64, i64)> = Vec::with_capacity(data.items.len());
    for item in &data.items {
        let price = match prices.get(&item.food_id) {
            Some(&price) => price,
            None => {
                let row: Option<(i64,)> = sqlx::query_as("SELECT price FROM foods WHERE id = ?")
                    .bind(item.food_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                let Some((price,)) = row else {
                    return Err(RepoError::Business(
                        ErrorCode::FoodNotFound,
                        format!("Food {} not found", item.food_id),
                    ));
                };
                prices.insert(item.food_id, price);
                price
            }
        };
        lines.push((item.quantity, price));
    }

    let total = compute_total(&lines)?;

    if let Some(claimed) = data.claimed_total
        && claimed != total
    {
        return Err(RepoError::Business(
            ErrorCode::OrderTotalMismatch,
            format!("Order total mismatch: submitted {claimed}, computed {total}"),
        ));
    }

    let order_id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO orders (id, user_id, total_amount, status, menu_date, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(order_id)
    .bind(data.user_id)
    .bind(total)
    .bind(OrderStatus::Pending)
    .bind(data.menu_date)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(data.items.len());
    for (input, &(quantity, price)) in data.items.iter().zip(lines.iter()) {
        let item_id = shared::util::snowflake_id();
        sqlx::query(
            "INSERT INTO order_items (id, order_id, food_id, quantity, price) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(item_id)
        .bind(order_id)
        .bind(input.food_id)
        .bind(quantity)
        .bind(price)
        .execute(&mut *tx)
        .await?;
        items.push(OrderItem {
            id: item_id,
            order_id,
            food_id: input.food_id,
            quantity,
            price,
        });
    }

    tx.commit().await?;

    tracing::info!(
        order_id,
        user_id = data.user_id,
        total,
        items = items.len(),
        "Order created"
    );

    Ok(OrderDetail {
        order: Order {
            id: order_id,
            user_id: data.user_id,
            total_amount: total,
            status: OrderStatus::Pending,
            menu_date: Some(data.menu_date),
            created_at: now,
            updated_at: now,
        },
        items,
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderDetail>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT id, user_id, total_amount, status, menu_date, created_at, updated_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    let Some(order) = order else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, food_id, quantity, price FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(OrderDetail { order, items }))
}
