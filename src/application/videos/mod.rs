pub mod delete;
pub mod publish;
pub mod toggle_publish;
pub mod update;

use crate::domain::videos::{Video, VideoRepository};
use crate::shared::error::AppError;
use crate::shared::validation::parse_reference;
use uuid::Uuid;

/// Loads a video the caller is about to mutate; only its owner may.
pub(crate) async fn load_owned(
    repo: &dyn VideoRepository,
    user_id: Uuid,
    video_id: &str,
) -> Result<Video, AppError> {
    let video_id = parse_reference(video_id, "video")?;

    let video = repo
        .find_by_id(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if !video.is_owned_by(user_id) {
        return Err(AppError::Forbidden(
            "Only the owner can modify this video".to_string(),
        ));
    }

    Ok(video)
}
