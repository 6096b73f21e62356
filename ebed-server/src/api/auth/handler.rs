//! Auth API Handlers

use axum::{Json, extract::State, http::HeaderMap};
use sha2::{Digest, Sha256};
use shared::error::ErrorCode;
use shared::models::{
    AuthResponse, ExternalSignInRequest, SignInRequest, SignUpRequest, User, UserProfile,
};
use shared::util::now_millis;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{JwtService, RequestContext};
use crate::core::ServerState;
use crate::db::{self, repository::user};
use crate::utils::validation::{normalize_email, validate_email, validate_name, validate_password};
use crate::utils::{AppError, AppResult};

fn session(state: &ServerState, user: &User) -> AppResult<AuthResponse> {
    let (token, expires_at) = state
        .jwt_service
        .generate_token(user)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;
    Ok(AuthResponse {
        token,
        expires_at,
        user: user.profile(),
    })
}

/// POST /api/auth/sign-up - new accounts start PENDING
pub async fn sign_up(
    State(state): State<ServerState>,
    Json(req): Json<SignUpRequest>,
) -> AppResult<Json<UserProfile>> {
    let full_name = req.full_name.trim().to_string();
    validate_name(&full_name, "full_name")?;
    let email = normalize_email(&req.email);
    validate_email(&email)?;
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let created = db::timed(
        state.query_timeout(),
        user::create(
            &state.pool,
            user::NewUser {
                full_name,
                email,
                password_hash,
            },
            now_millis(),
        ),
    )
    .await?;

    Ok(Json(created.profile()))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<ServerState>,
    Json(req): Json<SignInRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&req.email);
    let found = db::timed(state.query_timeout(), user::find_by_email(&state.pool, &email)).await?;

    let Some(found) = found else {
        tracing::debug!("Sign-in for unknown email");
        return Err(AppError::invalid_credentials());
    };
    if !verify_password(&req.password, &found.password_hash) {
        tracing::warn!(user_id = found.id, "Sign-in with wrong password");
        return Err(AppError::invalid_credentials());
    }

    tracing::info!(user_id = found.id, "User signed in");
    Ok(Json(session(&state, &found)?))
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

/// POST /api/auth/external - trusted bridge for third-party sign-in
///
/// The bridge authenticates with `Authorization: Bearer <EXTERNAL_AUTH_SECRET>`.
pub async fn external(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(req): Json<ExternalSignInRequest>,
) -> AppResult<Json<AuthResponse>> {
    let Some(secret) = state.config.external_auth_secret.as_deref() else {
        return Err(AppError::new(ErrorCode::ExternalAuthDisabled));
    };

    let presented = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .ok_or_else(AppError::not_authenticated)?;
    if digest(presented) != digest(secret) {
        tracing::warn!("External sign-in with wrong bridge secret");
        return Err(AppError::invalid_credentials());
    }

    let full_name = req.full_name.trim().to_string();
    validate_name(&full_name, "full_name")?;
    let email = normalize_email(&req.email);
    validate_email(&email)?;

    let found = db::timed(
        state.query_timeout(),
        user::find_or_create_external(&state.pool, &email, &full_name, now_millis()),
    )
    .await?;

    Ok(Json(session(&state, &found)?))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    ctx: RequestContext,
) -> AppResult<Json<UserProfile>> {
    let found = db::timed(state.query_timeout(), user::get(&state.pool, ctx.user_id)).await?;
    Ok(Json(found.profile()))
}
