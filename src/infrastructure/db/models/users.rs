use crate::domain::users::User;
use crate::infrastructure::db::models::asset_pair;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub const USER_COLUMNS: &str = "id, username, email, full_name, avatar_remote_id, avatar_url, \
     cover_image_remote_id, cover_image_url, watch_history, password_hash, refresh_token_hash, \
     created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct UserDbModel {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_remote_id: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_image_remote_id: Option<String>,
    pub cover_image_url: Option<String>,
    pub watch_history: Vec<Uuid>,
    pub password_hash: String,
    pub refresh_token_hash: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<UserDbModel> for User {
    fn from(model: UserDbModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            full_name: model.full_name,
            avatar: asset_pair(model.avatar_remote_id, model.avatar_url),
            cover_image: asset_pair(model.cover_image_remote_id, model.cover_image_url),
            watch_history: model.watch_history,
            password_hash: model.password_hash,
            refresh_token_hash: model.refresh_token_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
