use crate::application::auth::token_service::TokenService;
use crate::application::auth::token_utils::TokenResponse;
use crate::domain::auth::AuthError;
use crate::shared::error::AppError;
use serde::Deserialize;

/// Body form of the refresh call; the `refreshToken` cookie takes precedence.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct RefreshTokenRequest {
    #[serde(alias = "refreshToken")]
    pub refresh_token: Option<String>,
}

pub type RefreshTokenResponse = TokenResponse;

pub struct RefreshTokenUseCase {
    token_service: TokenService,
}

impl RefreshTokenUseCase {
    pub fn new(token_service: TokenService) -> Self {
        Self { token_service }
    }

    pub async fn execute(&self, refresh_token: Option<&str>) -> Result<RefreshTokenResponse, AppError> {
        let refresh_token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingCredentials)?;

        let pair = self.token_service.rotate(refresh_token).await?;

        Ok(TokenResponse::bearer(
            pair,
            self.token_service.access_token_expiry(),
        ))
    }
}
