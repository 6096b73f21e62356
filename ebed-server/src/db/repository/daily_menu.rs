//! Daily Menu Repository
//!
//! One menu per calendar date, one association per (menu, food). Both
//! are unique constraints, so concurrent writers converge on the same
//! rows and a conflicting insert counts as success.

use super::food::{self, FOOD_COLUMNS};
use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::error::ErrorCode;
use shared::models::{DailyMenu, DailyMenuWithFoods, Food, FoodCreate, MenuFoodChange};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

pub async fn find_by_date<'e, E>(exec: E, date: NaiveDate) -> RepoResult<Option<DailyMenu>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, DailyMenu>(
        "SELECT id, date, created_at FROM daily_menus WHERE date = ?",
    )
    .bind(date)
    .fetch_optional(exec)
    .await?;
    Ok(row)
}

/// Find-or-create inside an open transaction, returning the menu id
async fn ensure_menu(conn: &mut SqliteConnection, date: NaiveDate, now: i64) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let inserted = sqlx::query(
        "INSERT INTO daily_menus (id, date, created_at) VALUES (?1, ?2, ?3) ON CONFLICT(date) DO NOTHING",
    )
    .bind(id)
    .bind(date)
    .bind(now)
    .execute(&mut *conn)
    .await?;
    if inserted.rows_affected() > 0 {
        tracing::info!(daily_menu_id = id, %date, "Daily menu created");
    }

    let (menu_id,): (i64,) = sqlx::query_as("SELECT id FROM daily_menus WHERE date = ?")
        .bind(date)
        .fetch_one(&mut *conn)
        .await?;
    Ok(menu_id)
}

/// Link a food to a menu; false when the link already existed
async fn link_food(conn: &mut SqliteConnection, menu_id: i64, food_id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "INSERT INTO daily_menu_foods (id, daily_menu_id, food_id) VALUES (?1, ?2, ?3) ON CONFLICT(daily_menu_id, food_id) DO NOTHING",
    )
    .bind(shared::util::snowflake_id())
    .bind(menu_id)
    .bind(food_id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn find_or_create(pool: &SqlitePool, date: NaiveDate, now: i64) -> RepoResult<DailyMenu> {
    let mut tx = super::begin_write(pool).await?;
    ensure_menu(&mut tx, date, now).await?;
    let menu = find_by_date(&mut *tx, date)
        .await?
        .ok_or_else(|| RepoError::Database("Daily menu vanished after upsert".into()))?;
    tx.commit().await?;
    Ok(menu)
}

/// Menu for a date with its foods. An existing menu with no foods is
/// returned as an empty shell; a date with no menu yields None.
pub async fn get_menu_for_date(
    pool: &SqlitePool,
    date: NaiveDate,
) -> RepoResult<Option<DailyMenuWithFoods>> {
    let Some(menu) = find_by_date(pool, date).await? else {
        return Ok(None);
    };

    let sql = format!(
        "SELECT {FOOD_COLUMNS} FROM daily_menu_foods dmf JOIN foods f ON f.id = dmf.food_id WHERE dmf.daily_menu_id = ? ORDER BY dmf.id"
    );
    let foods = sqlx::query_as::<_, Food>(&sql)
        .bind(menu.id)
        .fetch_all(pool)
        .await?;

    Ok(Some(DailyMenuWithFoods {
        id: menu.id,
        date: menu.date,
        foods,
    }))
}

/// Idempotently add a catalog food to a date, creating the menu if needed
pub async fn add_food_to_date(
    pool: &SqlitePool,
    date: NaiveDate,
    food_id: i64,
    now: i64,
) -> RepoResult<MenuFoodChange> {
    let mut tx = super::begin_write(pool).await?;

    if food::find_by_id(&mut *tx, food_id).await?.is_none() {
        return Err(RepoError::Business(
            ErrorCode::FoodNotFound,
            format!("Food {food_id} not found"),
        ));
    }

    let menu_id = ensure_menu(&mut tx, date, now).await?;
    let changed = link_food(&mut tx, menu_id, food_id).await?;
    tx.commit().await?;

    tracing::debug!(%date, food_id, changed, "Food added to daily menu");
    Ok(MenuFoodChange {
        daily_menu_id: Some(menu_id),
        food_id,
        changed,
    })
}

/// Remove a food from a date. No menu or no link is a no-op; the menu
/// itself is kept even when it becomes empty.
pub async fn remove_food_from_date(
    pool: &SqlitePool,
    date: NaiveDate,
    food_id: i64,
) -> RepoResult<MenuFoodChange> {
    let Some(menu) = find_by_date(pool, date).await? else {
        return Ok(MenuFoodChange {
            daily_menu_id: None,
            food_id,
            changed: false,
        });
    };

    let rows = sqlx::query("DELETE FROM daily_menu_foods WHERE daily_menu_id = ? AND food_id = ?")
        .bind(menu.id)
        .bind(food_id)
        .execute(pool)
        .await?;

    tracing::debug!(%date, food_id, removed = rows.rows_affected(), "Food removed from daily menu");
    Ok(MenuFoodChange {
        daily_menu_id: Some(menu.id),
        food_id,
        changed: rows.rows_affected() > 0,
    })
}

/// Create a catalog food and put it on a date's menu in one transaction
pub async fn create_food_and_add_to_date(
    pool: &SqlitePool,
    date: NaiveDate,
    data: FoodCreate,
    now: i64,
) -> RepoResult<(Food, MenuFoodChange)> {
    let mut tx = super::begin_write(pool).await?;
    let food = food::insert(&mut *tx, data, now).await?;
    let menu_id = ensure_menu(&mut tx, date, now).await?;
    let changed = link_food(&mut tx, menu_id, food.id).await?;
    tx.commit().await?;

    let change = MenuFoodChange {
        daily_menu_id: Some(menu_id),
        food_id: food.id,
        changed,
    };
    Ok((food, change))
}
