//! Order-proof API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/order-proof", proof_routes())
}

fn proof_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::issue))
        .route("/verify", post(handler::verify))
}
