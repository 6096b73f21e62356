//! Request context extractor
//!
//! Validates the bearer token, then reloads role and status from the
//! store so revocations apply to tokens already issued.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{JwtError, JwtService, RequestContext};
use crate::core::ServerState;
use crate::db::{self, repository::user};
use crate::utils::AppError;

impl FromRequestParts<ServerState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(ctx.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                tracing::debug!(uri = %parts.uri, "Missing authorization header");
                return Err(AppError::not_authenticated());
            }
        };

        let claims = state.jwt_service.validate_token(token).map_err(|e| {
            tracing::warn!(error = %e, uri = %parts.uri, "Token rejected");
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;
        let user_id = claims
            .user_id()
            .map_err(|e| AppError::invalid_token(e.to_string()))?;

        let Some(user) = db::timed(state.query_timeout(), user::find_by_id(&state.pool, user_id)).await? else {
            tracing::warn!(user_id, "Token subject no longer exists");
            return Err(AppError::not_authenticated());
        };

        let ctx = RequestContext::from(&user);
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
