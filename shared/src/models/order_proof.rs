//! Order-proof (QR) Models

use super::statistics::UserOrderedFood;
use serde::{Deserialize, Serialize};

/// Signed payload encoded in the QR code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProofPayload {
    pub user_id: i64,
    /// Canonical YYYY-MM-DD
    pub date: String,
    pub issued_at: i64,
    /// Hex HMAC-SHA256 over `user_id|date|issued_at`
    pub sig: String,
}

/// Code handed to an approved user for display as a QR code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProofIssued {
    /// JSON text of an [`OrderProofPayload`]
    pub code: String,
    pub date: String,
    pub expires_at: i64,
}

/// Scanned code submitted by an administrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProofVerifyRequest {
    pub code: String,
}

/// What the scanning administrator sees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProofScan {
    pub user_id: i64,
    pub full_name: String,
    pub date: String,
    /// Empty string when the user has no image
    pub image_url: String,
    pub foods: Vec<UserOrderedFood>,
    pub total_amount: i64,
}
