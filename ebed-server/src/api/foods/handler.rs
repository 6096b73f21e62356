//! Food API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{Food, FoodCreate, FoodUpdate, MenuFoodChange};
use shared::util::now_millis;

use crate::auth::RequestContext;
use crate::core::ServerState;
use crate::db::{self, repository::daily_menu, repository::food};
use crate::services::image::resolve_image_url;
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_name, validate_optional_text,
};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Create payload; with `date` the new food also goes on that day's menu
#[derive(Debug, Deserialize)]
pub struct FoodCreatePayload {
    #[serde(flatten)]
    pub food: FoodCreate,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FoodCreated {
    pub food: Food,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<MenuFoodChange>,
}

fn validate_texts(
    full_name: Option<&str>,
    description: Option<&str>,
    category: Option<&str>,
    image_path: Option<&str>,
) -> AppResult<()> {
    if let Some(name) = full_name {
        validate_name(name, "full_name")?;
    }
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(image_path, "image_path", MAX_URL_LEN)?;
    Ok(())
}

/// GET /api/foods?limit= - first foods in catalog order
pub async fn list(
    State(state): State<ServerState>,
    _ctx: RequestContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Food>>> {
    let n = query.limit.unwrap_or(food::DEFAULT_FIRST_N);
    let foods = db::timed(state.query_timeout(), food::first_n(&state.pool, n)).await?;
    Ok(Json(foods))
}

/// GET /api/foods/search?q= - name matches first, then description matches
pub async fn search(
    State(state): State<ServerState>,
    _ctx: RequestContext,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Food>>> {
    let foods = db::timed(state.query_timeout(), food::search(&state.pool, &query.q)).await?;
    Ok(Json(foods))
}

/// GET /api/foods/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    _ctx: RequestContext,
    Path(id): Path<i64>,
) -> AppResult<Json<Food>> {
    let found = db::timed(state.query_timeout(), food::get(&state.pool, id)).await?;
    Ok(Json(found))
}

/// POST /api/foods - admin only
pub async fn create(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Json(payload): Json<FoodCreatePayload>,
) -> AppResult<Json<FoodCreated>> {
    ctx.require_admin()?;

    let FoodCreatePayload { mut food, date } = payload;
    food.full_name = food.full_name.trim().to_string();
    validate_texts(
        Some(food.full_name.as_str()),
        food.description.as_deref(),
        food.category.as_deref(),
        food.image_path.as_deref(),
    )?;
    food.image_path = food
        .image_path
        .map(|p| resolve_image_url(&state.config.image_url_endpoint, &p));

    let now = now_millis();
    let created = match date {
        Some(date) => {
            let date = parse_date(&date)?;
            let (food, change) = db::timed(
                state.query_timeout(),
                daily_menu::create_food_and_add_to_date(&state.pool, date, food, now),
            )
            .await?;
            FoodCreated {
                food,
                menu: Some(change),
            }
        }
        None => FoodCreated {
            food: db::timed(state.query_timeout(), food::create(&state.pool, food, now)).await?,
            menu: None,
        },
    };

    tracing::info!(food_id = created.food.id, admin_id = ctx.user_id, "Food created");
    Ok(Json(created))
}

/// PUT /api/foods/{id} - admin only; ordered items keep their frozen price
pub async fn update(
    State(state): State<ServerState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(mut payload): Json<FoodUpdate>,
) -> AppResult<Json<Food>> {
    ctx.require_admin()?;

    payload.full_name = payload.full_name.map(|n| n.trim().to_string());
    validate_texts(
        payload.full_name.as_deref(),
        payload.description.as_deref(),
        payload.category.as_deref(),
        payload.image_path.as_deref(),
    )?;
    payload.image_path = payload
        .image_path
        .map(|p| resolve_image_url(&state.config.image_url_endpoint, &p));

    let updated = db::timed(state.query_timeout(), food::update(&state.pool, id, payload)).await?;
    Ok(Json(updated))
}
