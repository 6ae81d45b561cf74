use crate::application::assets::AssetManager;
use crate::application::videos::load_owned;
use crate::domain::assets::{ResourceKind, TempFile};
use crate::domain::videos::{UpdateVideo, Video, VideoRepository};
use crate::shared::error::AppError;
use crate::shared::validation::{not_blank, validate};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVideoRequest {
    #[validate(custom(function = "not_blank", message = "Title cannot be blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank", message = "Description cannot be blank"))]
    pub description: Option<String>,
}

pub struct UpdateVideoUseCase {
    repo: Arc<dyn VideoRepository>,
    assets: AssetManager,
}

impl UpdateVideoUseCase {
    pub fn new(repo: Arc<dyn VideoRepository>, assets: AssetManager) -> Self {
        Self { repo, assets }
    }

    #[tracing::instrument(skip(self, req, thumbnail))]
    pub async fn execute(
        &self,
        user_id: Uuid,
        video_id: &str,
        req: UpdateVideoRequest,
        thumbnail: Option<TempFile>,
    ) -> Result<Video, AppError> {
        validate(&req)?;
        let video = load_owned(self.repo.as_ref(), user_id, video_id).await?;
        let id = video.id;

        let update = UpdateVideo {
            title: req.title.map(|t| t.trim().to_string()),
            description: req.description.map(|d| d.trim().to_string()),
            ..Default::default()
        };

        let Some(thumbnail) = thumbnail else {
            return self
                .repo
                .update(id, update)
                .await?
                .ok_or_else(|| AppError::NotFound("Video not found".to_string()));
        };

        let repo = self.repo.clone();
        self.assets
            .replace(
                Some(video.thumbnail),
                ResourceKind::Image,
                thumbnail,
                |asset| async move {
                    let updated = repo
                        .update(
                            id,
                            UpdateVideo {
                                thumbnail: Some(asset),
                                ..update
                            },
                        )
                        .await
                        .map_err(AppError::InternalServerError)?;
                    updated.ok_or_else(|| AppError::NotFound("Video not found".to_string()))
                },
            )
            .await
    }
}
