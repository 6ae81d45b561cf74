use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Like {
    pub id: Uuid,
    pub video: Uuid,
    pub liked_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Likes are unique per (video, liker); creating an existing pair is a no-op.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Returns true when a new like was recorded.
    async fn create(&self, video: Uuid, liked_by: Uuid) -> Result<bool, anyhow::Error>;
    /// Returns true when a like was removed.
    async fn delete(&self, video: Uuid, liked_by: Uuid) -> Result<bool, anyhow::Error>;
    async fn exists(&self, video: Uuid, liked_by: Uuid) -> Result<bool, anyhow::Error>;
    async fn delete_by_video(&self, video: Uuid) -> Result<u64, anyhow::Error>;
}
