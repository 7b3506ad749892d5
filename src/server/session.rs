use super::api_error::ApiError;
use super::state::ServerState;

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

/// Authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub warehouse_id: i64,
}

pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

fn extract_bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(HEADER_SESSION_TOKEN_KEY)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts).ok_or_else(|| {
            debug!("No bearer token in request headers.");
            ApiError::Unauthorized("token not provided")
        })?;

        let claims = ctx.user_manager.verify_token(&token).map_err(|e| {
            debug!("Rejected session token: {}", e);
            ApiError::Unauthorized("invalid token")
        })?;
        let user_id = claims
            .user_id()
            .ok_or(ApiError::Unauthorized("invalid token"))?;

        Ok(Session {
            user_id,
            warehouse_id: claims.warehouse_id,
        })
    }
}
