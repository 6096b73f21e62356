//! Services Module
//!
//! Stateless domain helpers that sit beside the repositories:
//! - [`OrderProofSigner`] - signed order-proof codes
//! - [`image`] - CDN URL resolution

pub mod image;
pub mod order_proof;

pub use order_proof::{OrderProofError, OrderProofSigner, VerifiedProof};
