use crate::domain::users::{DuplicateUser, UpdateUser, User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::validation::not_blank;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(custom(function = "not_blank", message = "Full name is required"))]
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "newemail@example.com")]
    pub email: String,
}

pub struct UpdateAccountUseCase {
    repo: Arc<dyn UserRepository>,
}

impl UpdateAccountUseCase {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, id: Uuid, req: UpdateAccountRequest) -> Result<User, AppError> {
        let email = req.email.trim().to_string();

        let existing = self.repo.find_by_username_or_email(None, Some(&email)).await?;
        if existing.is_some_and(|other| other.id != id) {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let update = UpdateUser {
            full_name: Some(req.full_name.trim().to_string()),
            email: Some(email),
            ..Default::default()
        };

        self.repo
            .update(id, update)
            .await
            .map_err(|e| {
                if e.is::<DuplicateUser>() {
                    AppError::Conflict("Email already in use".to_string())
                } else {
                    AppError::InternalServerError(e)
                }
            })?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
