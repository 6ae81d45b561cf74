use crate::domain::videos::{NewVideo, UpdateVideo, Video, VideoRepository};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::videos::{VIDEO_COLUMNS, VideoDbModel};
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresVideoRepository {
    pool: DbPool,
}

impl PostgresVideoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PostgresVideoRepository {
    async fn create(&self, new_video: NewVideo) -> Result<Video, anyhow::Error> {
        let sql = format!(
            r#"
            INSERT INTO videos (title, description, video_file_remote_id, video_file_url,
                                thumbnail_remote_id, thumbnail_url, duration, owner_id, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {VIDEO_COLUMNS}
            "#
        );

        let video = sqlx::query_as::<_, VideoDbModel>(&sql)
            .bind(new_video.title)
            .bind(new_video.description)
            .bind(new_video.video_file.remote_id)
            .bind(new_video.video_file.url)
            .bind(new_video.thumbnail.remote_id)
            .bind(new_video.thumbnail.url)
            .bind(new_video.duration)
            .bind(new_video.owner)
            .bind(new_video.is_published)
            .fetch_one(&self.pool)
            .await?;

        Ok(video.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, anyhow::Error> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");

        let video = sqlx::query_as::<_, VideoDbModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(video.map(Into::into))
    }

    async fn update(&self, id: Uuid, update: UpdateVideo) -> Result<Option<Video>, anyhow::Error> {
        let (thumbnail_remote_id, thumbnail_url) = update
            .thumbnail
            .map(|a| (Some(a.remote_id), Some(a.url)))
            .unwrap_or_default();

        let sql = format!(
            r#"
            UPDATE videos
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                thumbnail_remote_id = COALESCE($4, thumbnail_remote_id),
                thumbnail_url = COALESCE($5, thumbnail_url),
                is_published = COALESCE($6, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#
        );

        let video = sqlx::query_as::<_, VideoDbModel>(&sql)
            .bind(id)
            .bind(update.title)
            .bind(update.description)
            .bind(thumbnail_remote_id)
            .bind(thumbnail_url)
            .bind(update.is_published)
            .fetch_optional(&self.pool)
            .await?;

        Ok(video.map(Into::into))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Video>, anyhow::Error> {
        let sql = format!("DELETE FROM videos WHERE id = $1 RETURNING {VIDEO_COLUMNS}");

        let video = sqlx::query_as::<_, VideoDbModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(video.map(Into::into))
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>, anyhow::Error> {
        let views = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE videos
            SET views = views + 1
            WHERE id = $1
            RETURNING views
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(views)
    }
}
