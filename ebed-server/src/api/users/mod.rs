//! User administration API

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", user_routes())
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/pending", get(handler::list_pending))
        .route("/me/image", put(handler::update_my_image))
        .route("/{id}", get(handler::get_access))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
}
