use crate::domain::auth::AuthError;
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{UpdateUser, UserRepository};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    #[schema(min_length = 6)]
    pub new_password: String,
}

pub struct ChangePasswordUseCase {
    repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHashingService>,
}

impl ChangePasswordUseCase {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHashingService>,
    ) -> Self {
        Self {
            repo,
            password_hasher,
        }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, id: Uuid, req: ChangePasswordRequest) -> Result<(), AppError> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .password_hasher
            .verify_password(&req.old_password, &user.password_hash)?
        {
            return Err(AuthError::InvalidPassword.into());
        }

        let password_hash = self.password_hasher.hash_password(&req.new_password)?;
        self.repo
            .update(
                id,
                UpdateUser {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?;

        Ok(())
    }
}
