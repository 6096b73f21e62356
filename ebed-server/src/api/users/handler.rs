//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::models::{UserImageUpdate, UserProfile, UserRole, UserStatus};

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::db::{self, repository::user};
use crate::services::image::resolve_image_url;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_URL_LEN, validate_required_text};

/// Role, status and image of one user
#[derive(Debug, Serialize)]
pub struct UserAccess {
    pub user_id: i64,
    pub role: UserRole,
    /// Empty when unset
    pub status: String,
    /// Empty when unset
    pub image_url: String,
}

/// GET /api/users/pending
pub async fn list_pending(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<Vec<UserProfile>>> {
    ctx.require_admin()?;
    let users = db::timed(state.query_timeout(), user::list_pending(&state.pool)).await?;
    Ok(Json(users.iter().map(|u| u.profile()).collect()))
}

/// GET /api/users/{id}
pub async fn get_access(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<UserAccess>> {
    ctx.require_admin()?;
    let access = db::timed(state.query_timeout(), async {
        Ok(UserAccess {
            user_id: id,
            role: user::get_user_role(&state.pool, id).await?,
            status: user::get_user_status(&state.pool, id).await?,
            image_url: user::get_user_image(&state.pool, id).await?,
        })
    })
    .await?;
    Ok(Json(access))
}

async fn set_status(
    state: &ServerState,
    ctx: &RequestContext,
    id: i64,
    status: UserStatus,
) -> AppResult<Json<UserProfile>> {
    ctx.require_admin()?;
    let updated = db::timed(state.query_timeout(), user::set_status(&state.pool, id, status)).await?;
    tracing::info!(user_id = id, admin_id = ctx.user_id, status = status.as_str(), "User reviewed");
    Ok(Json(updated.profile()))
}

/// POST /api/users/{id}/approve
pub async fn approve(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<UserProfile>> {
    set_status(&state, &ctx, id, UserStatus::Approved).await
}

/// POST /api/users/{id}/reject
pub async fn reject(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<UserProfile>> {
    set_status(&state, &ctx, id, UserStatus::Rejected).await
}

/// PUT /api/users/me/image - path is resolved against the CDN endpoint
pub async fn update_my_image(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<UserImageUpdate>,
) -> AppResult<Json<UserProfile>> {
    validate_required_text(&payload.image_path, "image_path", MAX_URL_LEN)?;
    let url = resolve_image_url(&state.config.image_url_endpoint, &payload.image_path);
    let updated = db::timed(
        state.query_timeout(),
        user::update_image(&state.pool, ctx.user_id, &url),
    )
    .await?;
    Ok(Json(updated.profile()))
}
