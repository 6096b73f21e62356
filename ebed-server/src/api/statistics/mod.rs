//! Statistics API - admin only

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/statistics", statistics_routes())
}

fn statistics_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_statistics))
        .route("/daily", get(handler::get_daily_sales))
        .route("/users/{id}", get(handler::get_user_ordered_food))
}
