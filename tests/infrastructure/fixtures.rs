use crate::common::asset;
use uuid::Uuid;
use vidtube::domain::users::{NewUser, User, UserRepository};
use vidtube::domain::videos::{NewVideo, Video, VideoRepository};
use vidtube::infrastructure::db::DbPool;
use vidtube::infrastructure::repositories::{PostgresUserRepository, PostgresVideoRepository};

pub async fn user(pool: &DbPool, username: &str) -> User {
    PostgresUserRepository::new(pool.clone())
        .create(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            full_name: format!("{username} tester"),
            password_hash: "hash".to_string(),
            avatar: Some(asset(&format!("image/{username}"))),
            cover_image: None,
        })
        .await
        .expect("Failed to create user")
}

pub async fn video(pool: &DbPool, owner: Uuid, title: &str, published: bool) -> Video {
    PostgresVideoRepository::new(pool.clone())
        .create(NewVideo {
            title: title.to_string(),
            description: format!("about {title}"),
            video_file: asset(&format!("video/{}", Uuid::new_v4())),
            thumbnail: asset(&format!("image/{}", Uuid::new_v4())),
            duration: 5.0,
            owner,
            is_published: published,
        })
        .await
        .expect("Failed to create video")
}

pub async fn subscribe(pool: &DbPool, subscriber: Uuid, channel: Uuid) {
    sqlx::query("INSERT INTO subscriptions (subscriber_id, channel_id) VALUES ($1, $2)")
        .bind(subscriber)
        .bind(channel)
        .execute(pool)
        .await
        .expect("Failed to subscribe");
}
