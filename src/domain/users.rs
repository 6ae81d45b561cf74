use crate::domain::assets::RemoteAsset;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// A registered account. Serializes to its public document shape; the
/// password hash and refresh-token fingerprint never leave the process.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<RemoteAsset>,
    pub cover_image: Option<RemoteAsset>,
    pub watch_history: Vec<Uuid>,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip)]
    pub refresh_token_hash: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub avatar: Option<RemoteAsset>,
    pub cover_image: Option<RemoteAsset>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub avatar: Option<RemoteAsset>,
    pub cover_image: Option<RemoteAsset>,
}

/// Raised by [`UserRepository`] writes that collide with another user's
/// username or email.
#[derive(Debug, Error)]
#[error("username or email already taken")]
pub struct DuplicateUser;

/// Credential store adapter over user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, anyhow::Error>;
    /// Matches a user whose username equals `username` OR whose email equals `email`.
    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, anyhow::Error>;
    async fn update(&self, id: Uuid, update: UpdateUser) -> Result<Option<User>, anyhow::Error>;
    /// Overwrites the stored refresh-token fingerprint. Returns false when the user is missing.
    async fn set_refresh_token_hash(
        &self,
        id: Uuid,
        token_hash: Option<&str>,
    ) -> Result<bool, anyhow::Error>;
    /// Appends to the watch history unless the video is already present.
    async fn add_to_watch_history(&self, id: Uuid, video_id: Uuid) -> Result<bool, anyhow::Error>;
}
