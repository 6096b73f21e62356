//! Utilities: error re-exports, logging, time and input validation

pub mod logger;
pub mod time;
pub mod validation;

// Unified error types live in the shared crate
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
