use crate::domain::comments::Comment;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct CommentDbModel {
    pub id: Uuid,
    pub content: String,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<CommentDbModel> for Comment {
    fn from(model: CommentDbModel) -> Self {
        Self {
            id: model.id,
            content: model.content,
            video: model.video_id,
            owner: model.owner_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
