use crate::domain::assets::RemoteAsset;
use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_file: RemoteAsset,
    pub thumbnail: RemoteAsset,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Video {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub video_file: RemoteAsset,
    pub thumbnail: RemoteAsset,
    pub duration: f64,
    pub owner: Uuid,
    pub is_published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<RemoteAsset>,
    pub is_published: Option<bool>,
}

#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create(&self, new_video: NewVideo) -> Result<Video, anyhow::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, anyhow::Error>;
    async fn update(&self, id: Uuid, update: UpdateVideo) -> Result<Option<Video>, anyhow::Error>;
    async fn delete(&self, id: Uuid) -> Result<Option<Video>, anyhow::Error>;
    /// Adds one view and returns the new count, or `None` if the video is gone.
    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>, anyhow::Error>;
}
