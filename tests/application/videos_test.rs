use crate::common::TestEnv;
use std::sync::Arc;
use uuid::Uuid;
use vidtube::application::assets::AssetManager;
use vidtube::application::videos::delete::DeleteVideoUseCase;
use vidtube::application::videos::publish::{PublishVideoRequest, PublishVideoUseCase};
use vidtube::application::videos::toggle_publish::TogglePublishUseCase;
use vidtube::application::videos::update::{UpdateVideoRequest, UpdateVideoUseCase};
use vidtube::domain::assets::ResourceKind;
use vidtube::domain::comments::{CommentRepository, NewComment};
use vidtube::domain::likes::LikeRepository;
use vidtube::domain::videos::VideoRepository;
use vidtube::shared::error::AppError;

fn assets(env: &TestEnv) -> AssetManager {
    AssetManager::new(Arc::new(env.objects.clone()))
}

fn publish(env: &TestEnv) -> PublishVideoUseCase {
    PublishVideoUseCase::new(env.state.videos.clone(), assets(env))
}

fn form(duration: Option<f64>) -> PublishVideoRequest {
    PublishVideoRequest {
        title: "Cats at play".to_string(),
        description: "two cats".to_string(),
        duration,
    }
}

#[tokio::test]
async fn test_publish_creates_unpublished_video() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    env.objects.report_duration(Some(42.5));

    let video = publish(&env)
        .execute(
            ana.id,
            form(Some(10.0)),
            Some(env.temp_file("clip.mp4")),
            Some(env.temp_file("thumb.png")),
        )
        .await
        .unwrap();

    assert!(!video.is_published);
    assert_eq!(video.owner, ana.id);
    assert_eq!(video.duration, 42.5);
    assert!(video.video_file.remote_id.starts_with("video/"));
    assert!(video.thumbnail.remote_id.starts_with("image/"));
}

#[tokio::test]
async fn test_publish_duration_falls_back_to_request_then_zero() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;

    let with_hint = publish(&env)
        .execute(
            ana.id,
            form(Some(12.0)),
            Some(env.temp_file("a.mp4")),
            Some(env.temp_file("a.png")),
        )
        .await
        .unwrap();
    assert_eq!(with_hint.duration, 12.0);

    let without = publish(&env)
        .execute(
            ana.id,
            form(None),
            Some(env.temp_file("b.mp4")),
            Some(env.temp_file("b.png")),
        )
        .await
        .unwrap();
    assert_eq!(without.duration, 0.0);
}

#[tokio::test]
async fn test_publish_rejects_non_finite_duration() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;

    for duration in [f64::NAN, f64::INFINITY, -1.0] {
        let result = publish(&env)
            .execute(
                ana.id,
                form(Some(duration)),
                Some(env.temp_file("a.mp4")),
                Some(env.temp_file("a.png")),
            )
            .await;

        match result {
            Err(AppError::ValidationError(msg)) => {
                assert_eq!(msg, "Duration must be a non-negative number")
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }
    assert_eq!(env.objects.live_count(), 0);
}

#[tokio::test]
async fn test_publish_ignores_non_finite_store_duration() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    env.objects.report_duration(Some(f64::NAN));

    let video = publish(&env)
        .execute(
            ana.id,
            form(Some(7.0)),
            Some(env.temp_file("a.mp4")),
            Some(env.temp_file("a.png")),
        )
        .await
        .unwrap();

    assert_eq!(video.duration, 7.0);
}

#[tokio::test]
async fn test_publish_requires_both_files() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;

    let result = publish(&env)
        .execute(ana.id, form(None), Some(env.temp_file("a.mp4")), None)
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(env.objects.live_count(), 0);
}

#[tokio::test]
async fn test_publish_partial_upload_is_cleaned_up() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    env.objects.fail_stores_of(Some(ResourceKind::Image));

    let result = publish(&env)
        .execute(
            ana.id,
            form(None),
            Some(env.temp_file("a.mp4")),
            Some(env.temp_file("a.png")),
        )
        .await;

    assert!(matches!(result, Err(AppError::DependencyError(_))));
    assert_eq!(env.objects.live_count(), 0);
    assert_eq!(env.objects.deleted().len(), 1);
    assert!(env.objects.deleted()[0].starts_with("video/"));
}

#[tokio::test]
async fn test_publish_insert_failure_removes_uploads() {
    let env = TestEnv::new();

    // the memory store refuses videos whose owner does not exist
    let result = publish(&env)
        .execute(
            Uuid::new_v4(),
            form(None),
            Some(env.temp_file("a.mp4")),
            Some(env.temp_file("a.png")),
        )
        .await;

    assert!(matches!(result, Err(AppError::InternalServerError(_))));
    assert_eq!(env.objects.live_count(), 0);
    assert_eq!(env.objects.deleted().len(), 2);
}

#[tokio::test]
async fn test_non_owner_cannot_delete() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let bob = env.seed_user("bob").await;
    let video = env.seed_video(ana.id, "mine", true).await;

    let result = DeleteVideoUseCase::new(
        env.state.videos.clone(),
        env.state.likes.clone(),
        env.state.comments.clone(),
        assets(&env),
    )
    .execute(bob.id, &video.id.to_string())
    .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(
        VideoRepository::find_by_id(&env.store, video.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_delete_removes_media_and_engagement() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let bob = env.seed_user("bob").await;
    let video = env.seed_video(ana.id, "mine", true).await;
    LikeRepository::create(&env.store, video.id, bob.id)
        .await
        .unwrap();
    CommentRepository::create(
        &env.store,
        NewComment {
            content: "nice".to_string(),
            video: video.id,
            owner: bob.id,
        },
    )
    .await
    .unwrap();

    let deleted = DeleteVideoUseCase::new(
        env.state.videos.clone(),
        env.state.likes.clone(),
        env.state.comments.clone(),
        assets(&env),
    )
    .execute(ana.id, &video.id.to_string())
    .await
    .unwrap();

    assert_eq!(deleted.id, video.id);
    assert_eq!(
        env.objects.deleted(),
        vec![
            video.video_file.remote_id.clone(),
            video.thumbnail.remote_id.clone()
        ]
    );
    assert_eq!(env.store.like_count(video.id), 0);
    assert_eq!(env.store.comment_count(video.id), 0);
}

#[tokio::test]
async fn test_delete_survives_remote_failure() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let video = env.seed_video(ana.id, "mine", true).await;
    env.objects.fail_deletes(true);

    let result = DeleteVideoUseCase::new(
        env.state.videos.clone(),
        env.state.likes.clone(),
        env.state.comments.clone(),
        assets(&env),
    )
    .execute(ana.id, &video.id.to_string())
    .await;

    assert!(result.is_ok());
    assert!(
        VideoRepository::find_by_id(&env.store, video.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_toggle_publish() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let bob = env.seed_user("bob").await;
    let video = env.seed_video(ana.id, "draft", false).await;
    let use_case = TogglePublishUseCase::new(env.state.videos.clone());
    let id = video.id.to_string();

    assert!(use_case.execute(ana.id, &id).await.unwrap().is_published);
    assert!(!use_case.execute(ana.id, &id).await.unwrap().is_published);
    assert!(matches!(
        use_case.execute(bob.id, &id).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        use_case.execute(ana.id, &Uuid::new_v4().to_string()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_video_text_and_thumbnail() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let video = env.seed_video(ana.id, "old title", true).await;
    let use_case = UpdateVideoUseCase::new(env.state.videos.clone(), assets(&env));

    let updated = use_case
        .execute(
            ana.id,
            &video.id.to_string(),
            UpdateVideoRequest {
                title: Some("new title".to_string()),
                description: None,
            },
            Some(env.temp_file("thumb.png")),
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "new title");
    assert_eq!(updated.description, video.description);
    assert_ne!(updated.thumbnail, video.thumbnail);
    assert!(env.objects.contains(&updated.thumbnail.remote_id));
    assert_eq!(env.objects.deleted(), vec![video.thumbnail.remote_id.clone()]);
}

#[tokio::test]
async fn test_update_video_rejects_blank_title() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let video = env.seed_video(ana.id, "title", true).await;

    let result = UpdateVideoUseCase::new(env.state.videos.clone(), assets(&env))
        .execute(
            ana.id,
            &video.id.to_string(),
            UpdateVideoRequest {
                title: Some("   ".to_string()),
                description: None,
            },
            None,
        )
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}
