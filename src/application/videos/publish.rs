use crate::application::assets::AssetManager;
use crate::domain::assets::{ResourceKind, TempFile};
use crate::domain::videos::{NewVideo, Video, VideoRepository};
use crate::shared::error::AppError;
use crate::shared::validation::{finite_seconds, not_blank, validate};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Text fields of the multipart publish form
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct PublishVideoRequest {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
    /// Seconds; used when the object store cannot tell
    #[validate(custom(
        function = "finite_seconds",
        message = "Duration must be a non-negative number"
    ))]
    pub duration: Option<f64>,
}

pub struct PublishVideoUseCase {
    repo: Arc<dyn VideoRepository>,
    assets: AssetManager,
}

impl PublishVideoUseCase {
    pub fn new(repo: Arc<dyn VideoRepository>, assets: AssetManager) -> Self {
        Self { repo, assets }
    }

    #[tracing::instrument(skip(self, req, video_file, thumbnail), fields(title = %req.title))]
    pub async fn execute(
        &self,
        owner: Uuid,
        req: PublishVideoRequest,
        video_file: Option<TempFile>,
        thumbnail: Option<TempFile>,
    ) -> Result<Video, AppError> {
        validate(&req)?;

        let video_file = video_file
            .ok_or_else(|| AppError::ValidationError("Video file is required".to_string()))?;
        let thumbnail = thumbnail
            .ok_or_else(|| AppError::ValidationError("Thumbnail is required".to_string()))?;

        let (video_file, thumbnail) = futures::join!(
            self.assets.upload_media(video_file),
            self.assets.upload(thumbnail)
        );

        let (video_file, thumbnail) = match (video_file, thumbnail) {
            (Some(video_file), Some(thumbnail)) => (video_file, thumbnail),
            (video_file, thumbnail) => {
                if let Some(video_file) = video_file {
                    self.assets
                        .remove(Some(&video_file.remote_id), ResourceKind::Video)
                        .await;
                }
                if let Some(thumbnail) = thumbnail {
                    self.assets
                        .remove(Some(&thumbnail.remote_id), ResourceKind::Image)
                        .await;
                }
                return Err(AppError::DependencyError(
                    "Error while uploading video or thumbnail".to_string(),
                ));
            }
        };

        let duration = video_file
            .duration
            .filter(|d| finite_seconds(d).is_ok())
            .or(req.duration)
            .unwrap_or(0.0);
        let video_remote_id = video_file.remote_id.clone();
        let thumbnail_remote_id = thumbnail.remote_id.clone();

        let new_video = NewVideo {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            video_file: video_file.into(),
            thumbnail,
            duration,
            owner,
            is_published: false,
        };

        match self.repo.create(new_video).await {
            Ok(video) => Ok(video),
            Err(e) => {
                self.assets
                    .remove(Some(&video_remote_id), ResourceKind::Video)
                    .await;
                self.assets
                    .remove(Some(&thumbnail_remote_id), ResourceKind::Image)
                    .await;
                Err(AppError::InternalServerError(e))
            }
        }
    }
}
