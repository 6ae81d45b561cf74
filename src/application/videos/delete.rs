use crate::application::assets::AssetManager;
use crate::application::videos::load_owned;
use crate::domain::assets::ResourceKind;
use crate::domain::comments::CommentRepository;
use crate::domain::likes::LikeRepository;
use crate::domain::videos::{Video, VideoRepository};
use crate::shared::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Deletes the record first, then the remote media, then dependent likes
/// and comments.
pub struct DeleteVideoUseCase {
    videos: Arc<dyn VideoRepository>,
    likes: Arc<dyn LikeRepository>,
    comments: Arc<dyn CommentRepository>,
    assets: AssetManager,
}

impl DeleteVideoUseCase {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        likes: Arc<dyn LikeRepository>,
        comments: Arc<dyn CommentRepository>,
        assets: AssetManager,
    ) -> Self {
        Self {
            videos,
            likes,
            comments,
            assets,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, user_id: Uuid, video_id: &str) -> Result<Video, AppError> {
        let video = load_owned(self.videos.as_ref(), user_id, video_id).await?;

        let deleted = self
            .videos
            .delete(video.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

        self.assets
            .remove(Some(&deleted.video_file.remote_id), ResourceKind::Video)
            .await;
        self.assets
            .remove(Some(&deleted.thumbnail.remote_id), ResourceKind::Image)
            .await;

        let likes = self.likes.delete_by_video(deleted.id).await?;
        let comments = self.comments.delete_by_video(deleted.id).await?;
        tracing::debug!(likes, comments, "removed video engagement");

        Ok(deleted)
    }
}
