//! Daily menu API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menus", menu_routes())
}

fn menu_routes() -> Router<ServerState> {
    Router::new()
        .route("/{date}", get(handler::get_for_date))
        .route(
            "/{date}/foods/{food_id}",
            post(handler::add_food).delete(handler::remove_food),
        )
}
