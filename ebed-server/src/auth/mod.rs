//! Authentication and authorization
//!
//! - [`JwtService`] issues and validates session tokens
//! - [`RequestContext`] is the per-request identity handed to handlers
//! - [`password`] hashes and verifies credentials

pub mod context;
pub mod extractor;
pub mod jwt;
pub mod password;

pub use context::RequestContext;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
