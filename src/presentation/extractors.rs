use crate::domain::auth::{AuthError, Claims};
use crate::infrastructure::state::AppState;
use crate::presentation::handlers::token_service;
use crate::presentation::session::ACCESS_COOKIE;
use crate::shared::error::AppError;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

/// Authenticated user extractor
/// Reads the access token from the `accessToken` cookie, falling back to
/// `Authorization: Bearer`.
pub struct AuthUser {
    pub user_id: Uuid,
    pub claims: Claims,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ACCESS_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| bearer_token(parts))
            .ok_or(AuthError::MissingCredentials)?;

        let claims = token_service(state).verify_access(&token)?;
        let user_id = claims.user_id().map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser { user_id, claims })
    }
}
