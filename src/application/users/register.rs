use crate::application::assets::AssetManager;
use crate::domain::assets::{ResourceKind, TempFile};
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{DuplicateUser, NewUser, User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::validation::{not_blank, validate};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// Text fields of the multipart registration form
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom(function = "not_blank", message = "Full name is required"))]
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john@example.com")]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Username is required"))]
    #[schema(example = "johndoe")]
    pub username: String,
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,
}

pub struct RegisterUseCase {
    repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHashingService>,
    assets: AssetManager,
}

impl RegisterUseCase {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHashingService>,
        assets: AssetManager,
    ) -> Self {
        Self {
            repo,
            password_hasher,
            assets,
        }
    }

    #[tracing::instrument(skip(self, req, avatar, cover_image), fields(username = %req.username))]
    pub async fn execute(
        &self,
        req: RegisterRequest,
        avatar: Option<TempFile>,
        cover_image: Option<TempFile>,
    ) -> Result<User, AppError> {
        validate(&req)?;

        let username = req.username.trim().to_lowercase();
        let email = req.email.trim().to_string();

        if self
            .repo
            .find_by_username_or_email(Some(&username), Some(&email))
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }

        let avatar = avatar
            .ok_or_else(|| AppError::ValidationError("Avatar file is required".to_string()))?;

        let password_hash = self.password_hasher.hash_password(&req.password)?;

        let avatar = self
            .assets
            .upload(avatar)
            .await
            .ok_or_else(|| AppError::DependencyError("Avatar upload failed".to_string()))?;

        let cover_image = match cover_image {
            Some(file) => self.assets.upload(file).await,
            None => None,
        };

        let new_user = NewUser {
            username,
            email,
            full_name: req.full_name.trim().to_string(),
            password_hash,
            avatar: Some(avatar.clone()),
            cover_image: cover_image.clone(),
        };

        match self.repo.create(new_user).await {
            Ok(user) => Ok(user),
            Err(e) => {
                self.assets
                    .remove(Some(&avatar.remote_id), ResourceKind::Image)
                    .await;
                if let Some(cover_image) = cover_image {
                    self.assets
                        .remove(Some(&cover_image.remote_id), ResourceKind::Image)
                        .await;
                }
                // a concurrent registration can slip past the lookup above
                if e.is::<DuplicateUser>() {
                    return Err(AppError::Conflict(
                        "User with email or username already exists".to_string(),
                    ));
                }
                Err(AppError::InternalServerError(e))
            }
        }
    }
}
