//! Request context
//!
//! Identity of the caller, resolved once per request and passed to
//! handlers explicitly.

use shared::error::ErrorCode;
use shared::models::{User, UserRole, UserStatus};

use crate::utils::AppError;

/// Caller identity for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: i64,
    pub role: UserRole,
    /// Approval status as text; empty when unset
    pub status: String,
}

impl From<&User> for RequestContext {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            status: user.status.as_str().to_string(),
        }
    }
}

impl RequestContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_approved(&self) -> bool {
        self.status == UserStatus::Approved.as_str()
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = self.user_id, "Admin operation refused");
            Err(AppError::new(ErrorCode::AdminRequired))
        }
    }

    /// Admins pass regardless of status
    pub fn require_approved(&self) -> Result<(), AppError> {
        if self.is_admin() || self.is_approved() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::ApprovalRequired)
                .with_detail("status", self.status.clone()))
        }
    }
}
