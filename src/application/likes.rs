use crate::domain::likes::LikeRepository;
use crate::domain::videos::VideoRepository;
use crate::shared::error::AppError;
use crate::shared::validation::parse_reference;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LikeStatus {
    pub is_liked: bool,
}

pub struct ToggleLikeUseCase {
    videos: Arc<dyn VideoRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl ToggleLikeUseCase {
    pub fn new(videos: Arc<dyn VideoRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { videos, likes }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, user_id: Uuid, video_id: &str) -> Result<LikeStatus, AppError> {
        let video_id = parse_reference(video_id, "video")?;

        if self.videos.find_by_id(video_id).await?.is_none() {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        if self.likes.delete(video_id, user_id).await? {
            return Ok(LikeStatus { is_liked: false });
        }

        self.likes.create(video_id, user_id).await?;
        Ok(LikeStatus { is_liked: true })
    }
}
