use crate::domain::likes::LikeRepository;
use crate::infrastructure::db::DbPool;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresLikeRepository {
    pool: DbPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn create(&self, video: Uuid, liked_by: Uuid) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO likes (video_id, liked_by)
            VALUES ($1, $2)
            ON CONFLICT (video_id, liked_by) DO NOTHING
            "#,
        )
        .bind(video)
        .bind(liked_by)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, video: Uuid, liked_by: Uuid) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM likes WHERE video_id = $1 AND liked_by = $2")
            .bind(video)
            .bind(liked_by)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, video: Uuid, liked_by: Uuid) -> Result<bool, anyhow::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE video_id = $1 AND liked_by = $2)",
        )
        .bind(video)
        .bind(liked_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn delete_by_video(&self, video: Uuid) -> Result<u64, anyhow::Error> {
        let result = sqlx::query("DELETE FROM likes WHERE video_id = $1")
            .bind(video)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
