//! Daily Menu API Handlers
//!
//! Path dates must be canonical `YYYY-MM-DD`.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DailyMenuWithFoods, MenuFoodChange};
use shared::util::now_millis;

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::db::{self, repository::daily_menu};
use crate::utils::AppResult;
use crate::utils::time::parse_date;

/// GET /api/menus/{date} - `null` when no menu exists for the day
pub async fn get_for_date(
    State(state): State<ServerState>,
    _ctx: RequestContext,
    Path(date): Path<String>,
) -> AppResult<Json<Option<DailyMenuWithFoods>>> {
    let date = parse_date(&date)?;
    let menu = db::timed(
        state.query_timeout(),
        daily_menu::get_menu_for_date(&state.pool, date),
    )
    .await?;
    Ok(Json(menu))
}

/// POST /api/menus/{date}/foods/{food_id} - idempotent
pub async fn add_food(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path((date, food_id)): Path<(String, i64)>,
) -> AppResult<Json<MenuFoodChange>> {
    ctx.require_admin()?;
    let date = parse_date(&date)?;
    let change = db::timed(
        state.query_timeout(),
        daily_menu::add_food_to_date(&state.pool, date, food_id, now_millis()),
    )
    .await?;
    Ok(Json(change))
}

/// DELETE /api/menus/{date}/foods/{food_id} - no-op when absent
pub async fn remove_food(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path((date, food_id)): Path<(String, i64)>,
) -> AppResult<Json<MenuFoodChange>> {
    ctx.require_admin()?;
    let date = parse_date(&date)?;
    let change = db::timed(
        state.query_timeout(),
        daily_menu::remove_food_from_date(&state.pool, date, food_id),
    )
    .await?;
    Ok(Json(change))
}
