//! Order-proof codes
//!
//! A code is the JSON text of an [`OrderProofPayload`]. The signature is
//! hex HMAC-SHA256 over `user_id|date|issued_at`, so a scanner can trust
//! the user and date without a store lookup.

use chrono::NaiveDate;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::error::ErrorCode;
use shared::models::{OrderProofIssued, OrderProofPayload};
use thiserror::Error;

use crate::utils::AppError;
use crate::utils::time::{format_date, parse_date};

type HmacSha256 = Hmac<Sha256>;

/// Clock skew tolerated for `issued_at` in the future
const MAX_FUTURE_SKEW_MS: i64 = 60_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderProofError {
    #[error("Malformed order-proof code")]
    Malformed,

    #[error("Order-proof signature mismatch")]
    BadSignature,

    #[error("Order-proof code expired")]
    Expired,

    #[error("Order-proof code issued in the future")]
    NotYetValid,
}

impl From<OrderProofError> for AppError {
    fn from(err: OrderProofError) -> Self {
        let code = match err {
            OrderProofError::Expired => ErrorCode::OrderProofExpired,
            _ => ErrorCode::OrderProofInvalid,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Identity and date carried by a verified code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedProof {
    pub user_id: i64,
    pub date: NaiveDate,
    pub issued_at: i64,
}

pub struct OrderProofSigner {
    keyed: HmacSha256,
    max_age_ms: i64,
}

impl std::fmt::Debug for OrderProofSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderProofSigner")
            .field("max_age_ms", &self.max_age_ms)
            .finish_non_exhaustive()
    }
}

impl OrderProofSigner {
    pub fn new(secret: &[u8], max_age_secs: i64) -> Result<Self, hmac::digest::InvalidLength> {
        Ok(Self {
            keyed: HmacSha256::new_from_slice(secret)?,
            max_age_ms: max_age_secs.saturating_mul(1000),
        })
    }

    fn mac(&self, user_id: i64, date: &str, issued_at: i64) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(format!("{user_id}|{date}|{issued_at}").as_bytes());
        mac
    }

    pub fn issue(&self, user_id: i64, date: NaiveDate, now: i64) -> Result<OrderProofIssued, AppError> {
        let date = format_date(date);
        let sig = hex::encode(self.mac(user_id, &date, now).finalize().into_bytes());
        let payload = OrderProofPayload {
            user_id,
            date: date.clone(),
            issued_at: now,
            sig,
        };
        let code = serde_json::to_string(&payload)
            .map_err(|e| AppError::internal(format!("Failed to encode order proof: {e}")))?;
        Ok(OrderProofIssued {
            code,
            date,
            expires_at: now.saturating_add(self.max_age_ms),
        })
    }

    /// Check a scanned code against the key and the clock
    pub fn verify(&self, code: &str, now: i64) -> Result<VerifiedProof, OrderProofError> {
        let payload: OrderProofPayload =
            serde_json::from_str(code.trim()).map_err(|_| OrderProofError::Malformed)?;
        let date = parse_date(&payload.date).map_err(|_| OrderProofError::Malformed)?;
        let sig = hex::decode(&payload.sig).map_err(|_| OrderProofError::Malformed)?;

        self.mac(payload.user_id, &payload.date, payload.issued_at)
            .verify_slice(&sig)
            .map_err(|_| OrderProofError::BadSignature)?;

        if payload.issued_at > now.saturating_add(MAX_FUTURE_SKEW_MS) {
            return Err(OrderProofError::NotYetValid);
        }
        if now.saturating_sub(payload.issued_at) > self.max_age_ms {
            return Err(OrderProofError::Expired);
        }

        Ok(VerifiedProof {
            user_id: payload.user_id,
            date,
            issued_at: payload.issued_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_709_280_000_000;

    fn signer() -> OrderProofSigner {
        OrderProofSigner::new(b"order-proof-test-secret", 3600).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let issued = signer().issue(7, date(), NOW).unwrap();
        assert_eq!(issued.date, "2024-03-01");
        assert_eq!(issued.expires_at, NOW + 3_600_000);
        assert!(issued.code.contains("\"userId\":7"));

        let proof = signer().verify(&issued.code, NOW + 1000).unwrap();
        assert_eq!(proof.user_id, 7);
        assert_eq!(proof.date, date());
    }

    #[test]
    fn test_tampered_user_rejected() {
        let issued = signer().issue(7, date(), NOW).unwrap();
        let forged = issued.code.replace("\"userId\":7", "\"userId\":8");
        assert_eq!(
            signer().verify(&forged, NOW),
            Err(OrderProofError::BadSignature)
        );
    }

    #[test]
    fn test_other_key_rejected() {
        let issued = OrderProofSigner::new(b"another-key", 3600)
            .unwrap()
            .issue(7, date(), NOW)
            .unwrap();
        assert_eq!(
            signer().verify(&issued.code, NOW),
            Err(OrderProofError::BadSignature)
        );
    }

    #[test]
    fn test_expiry_and_future() {
        let issued = signer().issue(7, date(), NOW).unwrap();
        assert!(signer().verify(&issued.code, NOW + 3_600_000).is_ok());
        assert_eq!(
            signer().verify(&issued.code, NOW + 3_600_001),
            Err(OrderProofError::Expired)
        );
        assert_eq!(
            signer().verify(&issued.code, NOW - MAX_FUTURE_SKEW_MS - 1),
            Err(OrderProofError::NotYetValid)
        );
    }

    #[test]
    fn test_malformed() {
        for code in ["", "not json", "{\"userId\":1}"] {
            assert_eq!(signer().verify(code, NOW), Err(OrderProofError::Malformed));
        }
        let issued = signer().issue(7, date(), NOW).unwrap();
        let bad_hex = issued.code.replace("\"sig\":\"", "\"sig\":\"zz");
        assert_eq!(signer().verify(&bad_hex, NOW), Err(OrderProofError::Malformed));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::from(OrderProofError::Expired).code,
            ErrorCode::OrderProofExpired
        );
        assert_eq!(
            AppError::from(OrderProofError::BadSignature).code,
            ErrorCode::OrderProofInvalid
        );
    }
}
