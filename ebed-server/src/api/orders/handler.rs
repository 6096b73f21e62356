//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{OrderCreate, OrderDetail, UserOrderedFood};
use shared::util::now_millis;

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::db::{self, repository::order, repository::statistics};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, today};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// Defaults to today in the business timezone
    pub date: Option<String>,
}

/// POST /api/orders - prices come from the catalog, never the client.
/// Approval is not required to order; it gates the order-proof code.
pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    let menu_date = parse_date(&payload.date)?;

    let detail = db::timed(
        state.query_timeout(),
        order::create(
            &state.pool,
            order::NewOrder {
                user_id: ctx.user_id,
                items: payload.items,
                claimed_total: payload.total_amount,
                menu_date,
            },
            now_millis(),
        ),
    )
    .await?;
    Ok(Json(detail))
}

/// GET /api/orders/mine?date= - what the caller ordered that day, by `created_at`
pub async fn mine(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<UserOrderedFood>>> {
    let tz = state.tz();
    let date = match query.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => today(tz),
    };
    let foods = db::timed(
        state.query_timeout(),
        statistics::user_ordered_food(
            &state.pool,
            ctx.user_id,
            day_start_millis(date, tz),
            day_end_millis(date, tz),
        ),
    )
    .await?;
    Ok(Json(foods))
}

/// GET /api/orders/{id} - owner or admin
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = db::timed(state.query_timeout(), order::find_by_id(&state.pool, id))
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        })?;

    if detail.order.user_id != ctx.user_id && !ctx.is_admin() {
        return Err(AppError::permission_denied("Order belongs to another user"));
    }
    Ok(Json(detail))
}
