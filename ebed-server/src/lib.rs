//! EbédPortál server - workplace lunch ordering
//!
//! # Modules
//!
//! ```text
//! ebed-server/src/
//! ├── core/          # configuration, state, startup errors, server
//! ├── auth/          # JWT sessions, passwords, request context
//! ├── services/      # order-proof signing, image URLs
//! ├── api/           # HTTP routes and handlers
//! ├── utils/         # dates, validation, logging
//! └── db/            # SQLite pool, migrations, repositories
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{JwtService, RequestContext};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::init_logger;

/// Load `.env` and start logging; call once before anything else
pub fn setup_environment() -> crate::core::Result<Config> {
    // A missing .env file is normal in production
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;
    init_logger(&config.log_level, config.log_dir.as_deref());
    Ok(config)
}
