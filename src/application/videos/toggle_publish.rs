use crate::application::videos::load_owned;
use crate::domain::videos::{UpdateVideo, Video, VideoRepository};
use crate::shared::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub struct TogglePublishUseCase {
    repo: Arc<dyn VideoRepository>,
}

impl TogglePublishUseCase {
    pub fn new(repo: Arc<dyn VideoRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, user_id: Uuid, video_id: &str) -> Result<Video, AppError> {
        let video = load_owned(self.repo.as_ref(), user_id, video_id).await?;

        self.repo
            .update(
                video.id,
                UpdateVideo {
                    is_published: Some(!video.is_published),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }
}
