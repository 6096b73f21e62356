//! Statistics API Handlers
//!
//! `from`/`to` are inclusive calendar days in the business timezone,
//! applied to order creation time.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{DailySales, OrderStatistics, UserOrderedFood};

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::db::{self, repository::statistics, repository::user};
use crate::utils::AppResult;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, resolve_range, today};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// GET /api/statistics?from=&to= - per-food totals
pub async fn get_statistics(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<OrderStatistics>> {
    ctx.require_admin()?;
    let range = resolve_range(query.from.as_deref(), query.to.as_deref(), state.tz())?;
    let foods = db::timed(
        state.query_timeout(),
        statistics::food_sales(&state.pool, range.start, range.end),
    )
    .await?;
    Ok(Json(statistics::summarize(range.from, range.to, foods)?))
}

/// GET /api/statistics/daily?from=&to= - revenue per day
pub async fn get_daily_sales(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<DailySales>>> {
    ctx.require_admin()?;
    let tz = state.tz();
    let range = resolve_range(query.from.as_deref(), query.to.as_deref(), tz)?;
    let days = db::timed(
        state.query_timeout(),
        statistics::daily_sales(&state.pool, range.start, range.end, tz),
    )
    .await?;
    Ok(Json(days))
}

/// GET /api/statistics/users/{id}?date= - unknown users fail with UserNotFound
pub async fn get_user_ordered_food(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(user_id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<UserOrderedFood>>> {
    ctx.require_admin()?;
    let tz = state.tz();
    let date = match query.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => today(tz),
    };

    let foods = db::timed(state.query_timeout(), async {
        user::get(&state.pool, user_id).await?;
        statistics::user_ordered_food(
            &state.pool,
            user_id,
            day_start_millis(date, tz),
            day_end_millis(date, tz),
        )
        .await
    })
    .await?;
    Ok(Json(foods))
}
