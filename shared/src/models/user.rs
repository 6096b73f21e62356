//! User Model

use serde::{Deserialize, Serialize};

/// Authorization role. Set manually, never self-assigned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

/// Account approval status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum UserStatus {
    Pending,
    Approved,
    Rejected,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    /// Argon2 PHC string; empty for accounts created by the external sign-in bridge
    #[serde(skip)]
    pub password_hash: String,
    pub status: UserStatus,
    pub role: UserRole,
    pub image_url: Option<String>,
    pub created_at: i64,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: self.role,
            status: self.status,
            image_url: self.image_url.clone().unwrap_or_default(),
        }
    }
}

/// Public view of a user (no credentials)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    /// Empty string when the user has no image
    pub image_url: String,
}

/// Sign-up payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Sign-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Identity asserted by the external sign-in bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalSignInRequest {
    pub email: String,
    pub full_name: String,
}

/// Session issued after a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: UserProfile,
}

/// Profile image update payload (CDN path or absolute URL)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserImageUpdate {
    pub image_path: String,
}
