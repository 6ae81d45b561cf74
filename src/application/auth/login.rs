use crate::application::auth::token_service::TokenService;
use crate::application::auth::token_utils::TokenResponse;
use crate::domain::users::User;
use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "johndoe")]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john@example.com")]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub user: User,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

pub struct LoginUseCase {
    token_service: TokenService,
}

impl LoginUseCase {
    pub fn new(token_service: TokenService) -> Self {
        Self { token_service }
    }

    #[tracing::instrument(skip(self, req), fields(username = ?req.username, email = ?req.email))]
    pub async fn execute(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user = self
            .token_service
            .verify_credentials(req.username.as_deref(), req.email.as_deref(), &req.password)
            .await?;

        let pair = self.token_service.issue_pair(user.id).await?;

        Ok(LoginResponse {
            user,
            tokens: TokenResponse::bearer(pair, self.token_service.access_token_expiry()),
        })
    }
}
