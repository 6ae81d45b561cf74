use crate::domain::assets::RemoteAsset;
use crate::domain::videos::Video;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub const VIDEO_COLUMNS: &str = "id, title, description, video_file_remote_id, video_file_url, \
     thumbnail_remote_id, thumbnail_url, duration, views, is_published, owner_id, created_at, \
     updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct VideoDbModel {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_file_remote_id: String,
    pub video_file_url: String,
    pub thumbnail_remote_id: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<VideoDbModel> for Video {
    fn from(model: VideoDbModel) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            video_file: RemoteAsset {
                remote_id: model.video_file_remote_id,
                url: model.video_file_url,
            },
            thumbnail: RemoteAsset {
                remote_id: model.thumbnail_remote_id,
                url: model.thumbnail_url,
            },
            duration: model.duration,
            views: model.views,
            is_published: model.is_published,
            owner: model.owner_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
