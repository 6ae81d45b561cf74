use crate::domain::comments::{Comment, CommentRepository, NewComment};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::comments::CommentDbModel;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: DbPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, anyhow::Error> {
        let comment = sqlx::query_as::<_, CommentDbModel>(
            r#"
            INSERT INTO comments (content, video_id, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, video_id, owner_id, created_at, updated_at
            "#,
        )
        .bind(new_comment.content)
        .bind(new_comment.video)
        .bind(new_comment.owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment.into())
    }

    async fn delete_by_video(&self, video: Uuid) -> Result<u64, anyhow::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE video_id = $1")
            .bind(video)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
