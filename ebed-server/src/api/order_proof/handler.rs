//! Order-proof API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::{OrderProofIssued, OrderProofScan, OrderProofVerifyRequest};
use shared::util::now_millis;

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::db::{self, repository::statistics, repository::user};
use crate::utils::AppResult;
use crate::utils::time::{day_end_millis, day_start_millis, format_date, parse_date, today};

#[derive(Debug, Deserialize)]
pub struct IssueQuery {
    pub date: Option<String>,
}

/// GET /api/order-proof?date= - approved users only
pub async fn issue(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Query(query): Query<IssueQuery>,
) -> AppResult<Json<OrderProofIssued>> {
    ctx.require_approved()?;
    let date = match query.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => today(state.tz()),
    };
    let issued = state.order_proof.issue(ctx.user_id, date, now_millis())?;
    Ok(Json(issued))
}

/// POST /api/order-proof/verify - admin scans a code.
///
/// Lists what the owner ordered on the proof's date, by order `created_at`.
pub async fn verify(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(req): Json<OrderProofVerifyRequest>,
) -> AppResult<Json<OrderProofScan>> {
    ctx.require_admin()?;
    let proof = state.order_proof.verify(&req.code, now_millis()).map_err(|e| {
        tracing::warn!(admin_id = ctx.user_id, error = %e, "Order-proof rejected");
        e
    })?;

    let tz = state.tz();
    let (owner, foods) = db::timed(state.query_timeout(), async {
        let owner = user::get(&state.pool, proof.user_id).await?;
        let foods = statistics::user_ordered_food(
            &state.pool,
            proof.user_id,
            day_start_millis(proof.date, tz),
            day_end_millis(proof.date, tz),
        )
        .await?;
        Ok((owner, foods))
    })
    .await?;

    let total_amount = statistics::checked_sum(foods.iter().map(|f| f.total_amount))?;
    Ok(Json(OrderProofScan {
        user_id: owner.id,
        full_name: owner.full_name,
        date: format_date(proof.date),
        image_url: owner.image_url.unwrap_or_default(),
        foods,
        total_amount,
    }))
}
