//! Shared types for the EbédPortál lunch portal
//!
//! Error types, response structures and domain models used by the
//! server and by API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
