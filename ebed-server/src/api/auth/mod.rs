//! Auth API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/sign-up", post(handler::sign_up))
        .route("/sign-in", post(handler::sign_in))
        .route("/external", post(handler::external))
        .route("/me", get(handler::me))
}
