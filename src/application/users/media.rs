use crate::application::assets::AssetManager;
use crate::domain::assets::{RemoteAsset, ResourceKind, TempFile};
use crate::domain::users::{UpdateUser, User, UserRepository};
use crate::shared::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Which profile image an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileImage {
    Avatar,
    CoverImage,
}

impl ProfileImage {
    fn current(self, user: &User) -> Option<RemoteAsset> {
        match self {
            ProfileImage::Avatar => user.avatar.clone(),
            ProfileImage::CoverImage => user.cover_image.clone(),
        }
    }

    fn update(self, asset: RemoteAsset) -> UpdateUser {
        match self {
            ProfileImage::Avatar => UpdateUser {
                avatar: Some(asset),
                ..Default::default()
            },
            ProfileImage::CoverImage => UpdateUser {
                cover_image: Some(asset),
                ..Default::default()
            },
        }
    }
}

/// Backs both `update_avatar` and `update_cover_image`.
pub struct UpdateProfileImageUseCase {
    repo: Arc<dyn UserRepository>,
    assets: AssetManager,
}

impl UpdateProfileImageUseCase {
    pub fn new(repo: Arc<dyn UserRepository>, assets: AssetManager) -> Self {
        Self { repo, assets }
    }

    #[tracing::instrument(skip(self, file))]
    pub async fn execute(
        &self,
        id: Uuid,
        slot: ProfileImage,
        file: TempFile,
    ) -> Result<User, AppError> {
        let user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let repo = self.repo.clone();
        self.assets
            .replace(slot.current(&user), ResourceKind::Image, file, |asset| async move {
                let updated = repo
                    .update(id, slot.update(asset))
                    .await
                    .map_err(AppError::InternalServerError)?;
                updated.ok_or_else(|| AppError::NotFound("User not found".to_string()))
            })
            .await
    }
}
