//! API routes
//!
//! - [`health`] - liveness
//! - [`auth`] - sign-up, sign-in, external bridge, current user
//! - [`foods`] - catalog
//! - [`menus`] - daily menus
//! - [`orders`] - order placement and lookup
//! - [`statistics`] - sales aggregates
//! - [`users`] - approval and profile administration
//! - [`order_proof`] - signed order-proof codes

pub mod auth;
pub mod foods;
pub mod health;
pub mod menus;
pub mod order_proof;
pub mod orders;
pub mod statistics;
pub mod users;

use axum::Router;

use crate::core::ServerState;

pub use crate::utils::AppResult;

/// All routes, before middleware
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(foods::router())
        .merge(menus::router())
        .merge(orders::router())
        .merge(statistics::router())
        .merge(users::router())
        .merge(order_proof::router())
}

#[cfg(test)]
mod tests;
