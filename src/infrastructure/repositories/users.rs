use crate::domain::users::{DuplicateUser, NewUser, UpdateUser, User, UserRepository};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::db::models::users::{USER_COLUMNS, UserDbModel};
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: DbPool,
}

impl PostgresUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error> {
        let (avatar_remote_id, avatar_url) = new_user
            .avatar
            .map(|a| (Some(a.remote_id), Some(a.url)))
            .unwrap_or_default();
        let (cover_remote_id, cover_url) = new_user
            .cover_image
            .map(|a| (Some(a.remote_id), Some(a.url)))
            .unwrap_or_default();

        let sql = format!(
            r#"
            INSERT INTO users (username, email, full_name, password_hash,
                               avatar_remote_id, avatar_url, cover_image_remote_id, cover_image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, UserDbModel>(&sql)
            .bind(new_user.username)
            .bind(new_user.email)
            .bind(new_user.full_name)
            .bind(new_user.password_hash)
            .bind(avatar_remote_id)
            .bind(avatar_url)
            .bind(cover_remote_id)
            .bind(cover_url)
            .fetch_one(&self.pool)
            .await
            .map_err(duplicate_or)?;

        Ok(user.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, anyhow::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, UserDbModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user.map(Into::into))
    }

    async fn find_by_username_or_email(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, anyhow::Error> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::text IS NOT NULL AND username = $1)
               OR ($2::text IS NOT NULL AND email = $2)
            ORDER BY created_at
            LIMIT 1
            "#
        );

        let user = sqlx::query_as::<_, UserDbModel>(&sql)
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user.map(Into::into))
    }

    async fn update(&self, id: Uuid, update: UpdateUser) -> Result<Option<User>, anyhow::Error> {
        let (avatar_remote_id, avatar_url) = update
            .avatar
            .map(|a| (Some(a.remote_id), Some(a.url)))
            .unwrap_or_default();
        let (cover_remote_id, cover_url) = update
            .cover_image
            .map(|a| (Some(a.remote_id), Some(a.url)))
            .unwrap_or_default();

        let sql = format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                avatar_remote_id = COALESCE($5, avatar_remote_id),
                avatar_url = COALESCE($6, avatar_url),
                cover_image_remote_id = COALESCE($7, cover_image_remote_id),
                cover_image_url = COALESCE($8, cover_image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, UserDbModel>(&sql)
            .bind(id)
            .bind(update.full_name)
            .bind(update.email)
            .bind(update.password_hash)
            .bind(avatar_remote_id)
            .bind(avatar_url)
            .bind(cover_remote_id)
            .bind(cover_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(duplicate_or)?;

        Ok(user.map(Into::into))
    }

    async fn set_refresh_token_hash(
        &self,
        id: Uuid,
        token_hash: Option<&str>,
    ) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_to_watch_history(&self, id: Uuid, video_id: Uuid) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET watch_history = array_append(watch_history, $2)
            WHERE id = $1 AND NOT ($2 = ANY(watch_history))
            "#,
        )
        .bind(id)
        .bind(video_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Unique violations on `username` or `email` become [`DuplicateUser`].
fn duplicate_or(e: sqlx::Error) -> anyhow::Error {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DuplicateUser.into(),
        _ => e.into(),
    }
}
