//! Health check
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /health | GET | none |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    /// false when the store does not answer
    database: bool,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let database = crate::db::timed(state.query_timeout(), async {
        sqlx::query("SELECT 1").execute(&state.pool).await?;
        Ok(())
    })
    .await
    .is_ok();

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        service: "ebed-server",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
