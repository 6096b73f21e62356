//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps Unix milliseconds.

pub mod daily_menu;
pub mod food;
pub mod order;
pub mod order_proof;
pub mod statistics;
pub mod user;

// Re-exports
pub use daily_menu::*;
pub use food::*;
pub use order::*;
pub use order_proof::*;
pub use statistics::*;
pub use user::*;
