use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::services::OrderProofSigner;

/// Server state, cloned into every handler
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | immutable configuration |
/// | pool | SqlitePool | store connection pool |
/// | jwt_service | Arc<JwtService> | session tokens |
/// | order_proof | Arc<OrderProofSigner> | order-proof codes |
///
/// Every field is cheap to clone.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub order_proof: Arc<OrderProofSigner>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Result<Self> {
        let jwt_service = Arc::new(JwtService::from_config(&config));
        let order_proof = OrderProofSigner::new(
            config.order_proof_secret.as_bytes(),
            config.order_proof_max_age_secs,
        )
        .map_err(|e| ServerError::Config(format!("ORDER_PROOF_SECRET: {e}")))?;
        Ok(Self {
            config,
            pool,
            jwt_service,
            order_proof: Arc::new(order_proof),
        })
    }

    /// Open the database and build the state
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(config).await?;
        Self::new(config.clone(), db.pool)
    }

    /// Deadline for a single store call
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.config.query_timeout_ms)
    }

    /// Business timezone for calendar-day boundaries
    pub fn tz(&self) -> Tz {
        self.config.timezone
    }
}
