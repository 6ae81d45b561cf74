use crate::common::TestEnv;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use vidtube::application::assets::AssetManager;
use vidtube::domain::assets::{ResourceKind, TempFile};
use vidtube::shared::error::AppError;

fn manager(env: &TestEnv) -> AssetManager {
    AssetManager::new(Arc::new(env.objects.clone()))
}

fn spooled(env: &TestEnv, name: &str) -> (TempFile, std::path::PathBuf) {
    let file = env.temp_file(name);
    let path = file.path().to_path_buf();
    (file, path)
}

#[tokio::test]
async fn test_upload_leaves_no_temp_file() {
    let env = TestEnv::new();
    let assets = manager(&env);

    let (ok, ok_path) = spooled(&env, "ok.png");
    assert!(assets.upload(ok).await.is_some());
    assert!(!ok_path.exists());

    env.objects.fail_stores(true);
    let (failing, failing_path) = spooled(&env, "fail.png");
    assert!(assets.upload(failing).await.is_none());
    assert!(!failing_path.exists());
}

#[tokio::test]
async fn test_replace_deletes_previous_after_commit() {
    let env = TestEnv::new();
    let assets = manager(&env);
    let old = assets.upload(env.temp_file("old.png")).await.unwrap();

    let new = assets
        .replace(
            Some(old.clone()),
            ResourceKind::Image,
            env.temp_file("new.png"),
            |asset| async move { Ok::<_, AppError>(asset) },
        )
        .await
        .unwrap();

    assert!(env.objects.contains(&new.remote_id));
    assert!(!env.objects.contains(&old.remote_id));
}

#[tokio::test]
async fn test_replace_commit_failure_keeps_previous() {
    let env = TestEnv::new();
    let assets = manager(&env);
    let old = assets.upload(env.temp_file("old.png")).await.unwrap();

    let result: Result<(), AppError> = assets
        .replace(
            Some(old.clone()),
            ResourceKind::Image,
            env.temp_file("new.png"),
            |_| async { Err(AppError::NotFound("User not found".to_string())) },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(env.objects.contains(&old.remote_id));
    assert_eq!(env.objects.live_count(), 1);
    assert_eq!(env.objects.deleted().len(), 1);
}

#[tokio::test]
async fn test_replace_upload_failure_commits_nothing() {
    let env = TestEnv::new();
    let assets = manager(&env);
    env.objects.fail_stores(true);
    let committed = AtomicBool::new(false);
    let flag = &committed;

    let result = assets
        .replace(None, ResourceKind::Image, env.temp_file("new.png"), |_| async move {
            flag.store(true, Ordering::SeqCst);
            Ok::<_, AppError>(())
        })
        .await;

    assert!(matches!(result, Err(AppError::DependencyError(_))));
    assert!(!committed.load(Ordering::SeqCst));
}
