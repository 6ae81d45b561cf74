use crate::common;
use crate::fixtures;
use serial_test::serial;
use vidtube::domain::comments::{CommentRepository, NewComment};
use vidtube::domain::likes::LikeRepository;
use vidtube::domain::users::{DuplicateUser, UpdateUser, UserRepository};
use vidtube::domain::videos::{UpdateVideo, VideoRepository};
use vidtube::infrastructure::repositories::{
    PostgresCommentRepository, PostgresLikeRepository, PostgresUserRepository,
    PostgresVideoRepository,
};

#[tokio::test]
#[serial]
async fn test_user_repository_round_trip() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresUserRepository::new(pool.clone());

    let ana = fixtures::user(&pool, "ana").await;
    assert_eq!(ana.avatar.as_ref().unwrap().remote_id, "image/ana");
    assert!(ana.cover_image.is_none());
    assert!(ana.watch_history.is_empty());

    let by_email = repo
        .find_by_username_or_email(None, Some("ana@example.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, ana.id);
    assert!(
        repo.find_by_username_or_email(Some("nobody"), None)
            .await
            .unwrap()
            .is_none()
    );

    let updated = repo
        .update(
            ana.id,
            UpdateUser {
                cover_image: Some(common::asset("image/cover")),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.avatar, ana.avatar);
    assert_eq!(updated.cover_image.unwrap().remote_id, "image/cover");

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_duplicate_username_rejected() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;

    fixtures::user(&pool, "ana").await;
    let again = PostgresUserRepository::new(pool.clone())
        .create(vidtube::domain::users::NewUser {
            username: "ana".to_string(),
            email: "other@example.com".to_string(),
            full_name: "Other".to_string(),
            password_hash: "hash".to_string(),
            avatar: None,
            cover_image: None,
        })
        .await;
    assert!(again.unwrap_err().is::<DuplicateUser>());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_refresh_hash_and_watch_history() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresUserRepository::new(pool.clone());
    let ana = fixtures::user(&pool, "ana").await;
    let video = fixtures::video(&pool, ana.id, "clip", true).await;

    assert!(repo.set_refresh_token_hash(ana.id, Some("abc")).await.unwrap());
    assert!(
        !repo
            .set_refresh_token_hash(uuid::Uuid::new_v4(), Some("abc"))
            .await
            .unwrap()
    );

    repo.add_to_watch_history(ana.id, video.id).await.unwrap();
    repo.add_to_watch_history(ana.id, video.id).await.unwrap();

    let stored = repo.find_by_id(ana.id).await.unwrap().unwrap();
    assert_eq!(stored.refresh_token_hash.as_deref(), Some("abc"));
    assert_eq!(stored.watch_history, vec![video.id]);

    repo.set_refresh_token_hash(ana.id, None).await.unwrap();
    let stored = repo.find_by_id(ana.id).await.unwrap().unwrap();
    assert!(stored.refresh_token_hash.is_none());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_video_repository_views_update_delete() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let repo = PostgresVideoRepository::new(pool.clone());
    let ana = fixtures::user(&pool, "ana").await;
    let video = fixtures::video(&pool, ana.id, "clip", false).await;

    assert_eq!(repo.increment_views(video.id).await.unwrap(), Some(1));
    assert_eq!(repo.increment_views(video.id).await.unwrap(), Some(2));
    assert_eq!(
        repo.increment_views(uuid::Uuid::new_v4()).await.unwrap(),
        None
    );

    let updated = repo
        .update(
            video.id,
            UpdateVideo {
                title: Some("renamed".to_string()),
                is_published: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "renamed");
    assert_eq!(updated.description, video.description);
    assert!(updated.is_published);
    assert_eq!(updated.views, 2);

    let deleted = repo.delete(video.id).await.unwrap().unwrap();
    assert_eq!(deleted.thumbnail, video.thumbnail);
    assert!(repo.find_by_id(video.id).await.unwrap().is_none());
    assert!(repo.delete(video.id).await.unwrap().is_none());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[serial]
async fn test_likes_and_comments() {
    let pool = setup_test_db_or_skip!();
    common::cleanup_test_db(&pool).await;
    let likes = PostgresLikeRepository::new(pool.clone());
    let comments = PostgresCommentRepository::new(pool.clone());
    let ana = fixtures::user(&pool, "ana").await;
    let bob = fixtures::user(&pool, "bob").await;
    let video = fixtures::video(&pool, ana.id, "clip", true).await;

    assert!(likes.create(video.id, bob.id).await.unwrap());
    assert!(!likes.create(video.id, bob.id).await.unwrap());
    assert!(likes.exists(video.id, bob.id).await.unwrap());
    assert!(likes.create(video.id, ana.id).await.unwrap());

    comments
        .create(NewComment {
            content: "nice".to_string(),
            video: video.id,
            owner: bob.id,
        })
        .await
        .unwrap();

    assert!(likes.delete(video.id, bob.id).await.unwrap());
    assert!(!likes.delete(video.id, bob.id).await.unwrap());
    assert_eq!(likes.delete_by_video(video.id).await.unwrap(), 1);
    assert_eq!(comments.delete_by_video(video.id).await.unwrap(), 1);

    common::cleanup_test_db(&pool).await;
}
