//! Denormalized view models produced by the feed pipelines.

use crate::domain::assets::RemoteAsset;
use crate::shared::error::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Public URL of a media reference; `url` is null when the reference is unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssetUrl {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar: AssetUrl,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoFeedItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_file: RemoteAsset,
    pub thumbnail: RemoteAsset,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: Option<OwnerSummary>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChannelProfile {
    pub id: Uuid,
    pub full_name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar: AssetUrl,
    #[serde(default)]
    pub cover_image: AssetUrl,
    pub subscribers_count: u64,
    pub channels_subscribed_to_count: u64,
    pub is_subscribed: bool,
}

/// Video owner as shown on the detail page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChannelSummary {
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub avatar: AssetUrl,
    pub subscribers_count: u64,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_file: AssetUrl,
    pub thumbnail: AssetUrl,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub owner: Option<ChannelSummary>,
    pub likes_count: u64,
    pub is_liked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub(crate) fn decode<T: DeserializeOwned>(doc: Value) -> Result<T, AppError> {
    serde_json::from_value(doc)
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("malformed view document: {}", e)))
}
