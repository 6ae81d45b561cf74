use crate::application::auth::token_service::TokenService;
use crate::shared::error::AppError;
use uuid::Uuid;

pub struct LogoutUseCase {
    token_service: TokenService,
}

impl LogoutUseCase {
    pub fn new(token_service: TokenService) -> Self {
        Self { token_service }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AppError> {
        self.token_service.revoke(user_id).await
    }
}
