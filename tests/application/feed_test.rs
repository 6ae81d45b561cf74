use crate::common::TestEnv;
use vidtube::application::feed::channel_profile::ChannelProfileUseCase;
use vidtube::application::feed::list_videos::{ListVideosQuery, ListVideosUseCase};
use vidtube::application::feed::video_detail::VideoDetailUseCase;
use vidtube::application::feed::watch_history::WatchHistoryUseCase;
use vidtube::domain::likes::LikeRepository;
use vidtube::domain::users::UserRepository;
use vidtube::shared::error::AppError;

fn feed(env: &TestEnv) -> ListVideosUseCase {
    ListVideosUseCase::new(env.state.aggregation.clone())
}

fn detail(env: &TestEnv) -> VideoDetailUseCase {
    VideoDetailUseCase::new(
        env.state.aggregation.clone(),
        env.state.videos.clone(),
        env.state.users.clone(),
    )
}

#[tokio::test]
async fn test_feed_hides_unpublished_even_for_owner_filter() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let live = env.seed_video(ana.id, "live", true).await;
    env.seed_video(ana.id, "draft", false).await;

    let page = feed(&env)
        .execute(ListVideosQuery {
            user_id: Some(ana.id.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].id, live.id);
    assert!(page.items.iter().all(|v| v.is_published));
}

#[tokio::test]
async fn test_second_page_is_items_eleven_to_twenty() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let mut ids = Vec::new();
    for i in 1..=25 {
        ids.push(env.seed_video(ana.id, &format!("clip {i}"), true).await.id);
    }

    let page = feed(&env)
        .execute(ListVideosQuery {
            page: Some(2),
            limit: Some(10),
            sort_by: Some("createdAt".to_string()),
            sort_type: Some("asc".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let got: Vec<_> = page.items.iter().map(|v| v.id).collect();
    assert_eq!(got, ids[10..20].to_vec());
    assert_eq!(page.total_items, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 2);
}

#[tokio::test]
async fn test_default_order_is_newest_first_with_owner() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    env.seed_video(ana.id, "older", true).await;
    let newer = env.seed_video(ana.id, "newer", true).await;

    let page = feed(&env).execute(ListVideosQuery::default()).await.unwrap();

    assert_eq!(page.items[0].id, newer.id);
    let owner = page.items[0].owner.as_ref().unwrap();
    assert_eq!(owner.id, ana.id);
    assert_eq!(owner.username, "ana");
    assert_eq!(owner.avatar.url.as_deref(), Some("memory://image/seed-avatar"));
}

#[tokio::test]
async fn test_search_cats_sorted_by_views() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    for (i, title) in ["Cats at play", "cats sleeping", "CATS vs dogs", "Cats again", "more cats", "cats forever", "dogs only"]
        .iter()
        .enumerate()
    {
        let video = env.seed_video(ana.id, title, true).await;
        env.add_views(video.id, i * 2 % 5).await;
    }

    let page = feed(&env)
        .execute(ListVideosQuery {
            query: Some("cats".to_string()),
            sort_by: Some("views".to_string()),
            sort_type: Some("desc".to_string()),
            limit: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_items, 6);
    assert!(page.items.iter().all(|v| v.title.to_lowercase().contains("cats")));
    assert!(page.items.windows(2).all(|w| w[0].views >= w[1].views));
}

#[tokio::test]
async fn test_invalid_user_filter() {
    let env = TestEnv::new();

    let result = feed(&env)
        .execute(ListVideosQuery {
            user_id: Some("nope".to_string()),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::InvalidReference(_))));
}

#[tokio::test]
async fn test_detail_twice_counts_views_twice_history_once() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let bob = env.seed_user("bob").await;
    let video = env.seed_video(ana.id, "live", true).await;
    let id = video.id.to_string();

    let first = detail(&env).execute(&id, bob.id).await.unwrap();
    let second = detail(&env).execute(&id, bob.id).await.unwrap();

    assert_eq!(first.views, 1);
    assert_eq!(second.views, 2);

    let bob = UserRepository::find_by_id(&env.store, bob.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bob.watch_history, vec![video.id]);
}

#[tokio::test]
async fn test_detail_includes_likes_and_channel() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let bob = env.seed_user("bob").await;
    let video = env.seed_video(ana.id, "live", true).await;
    LikeRepository::create(&env.store, video.id, bob.id)
        .await
        .unwrap();
    env.store.seed_subscription(bob.id, ana.id);

    let view = detail(&env)
        .execute(&video.id.to_string(), bob.id)
        .await
        .unwrap();

    assert_eq!(view.likes_count, 1);
    assert!(view.is_liked);
    let owner = view.owner.unwrap();
    assert_eq!(owner.id, ana.id);
    assert_eq!(owner.subscribers_count, 1);
    assert!(owner.is_subscribed);
    assert_eq!(view.video_file.url, Some(video.video_file.url));
}

#[tokio::test]
async fn test_draft_detail_visible_to_owner_only() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let bob = env.seed_user("bob").await;
    let draft = env.seed_video(ana.id, "draft", false).await;
    let id = draft.id.to_string();

    assert!(detail(&env).execute(&id, ana.id).await.is_ok());
    assert!(matches!(
        detail(&env).execute(&id, bob.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_detail_bad_id() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;

    assert!(matches!(
        detail(&env).execute("not-a-uuid", ana.id).await,
        Err(AppError::InvalidReference(_))
    ));
}

#[tokio::test]
async fn test_channel_profile_counts() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let bob = env.seed_user("bob").await;
    let cleo = env.seed_user("cleo").await;
    env.store.seed_subscription(bob.id, ana.id);
    env.store.seed_subscription(cleo.id, ana.id);
    env.store.seed_subscription(ana.id, cleo.id);

    let profile = ChannelProfileUseCase::new(env.state.aggregation.clone())
        .execute("ANA", Some(bob.id))
        .await
        .unwrap();

    assert_eq!(profile.id, ana.id);
    assert_eq!(profile.subscribers_count, 2);
    assert_eq!(profile.channels_subscribed_to_count, 1);
    assert!(profile.is_subscribed);
    assert_eq!(profile.cover_image.url, None);
}

#[tokio::test]
async fn test_channel_profile_missing() {
    let env = TestEnv::new();
    let use_case = ChannelProfileUseCase::new(env.state.aggregation.clone());

    assert!(matches!(
        use_case.execute("ghost", None).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        use_case.execute("  ", None).await,
        Err(AppError::ValidationError(_))
    ));
}

#[tokio::test]
async fn test_watch_history_lists_viewed_videos() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let bob = env.seed_user("bob").await;
    let first = env.seed_video(ana.id, "first", true).await;
    let second = env.seed_video(ana.id, "second", true).await;
    env.seed_video(ana.id, "unseen", true).await;

    detail(&env).execute(&first.id.to_string(), bob.id).await.unwrap();
    detail(&env).execute(&second.id.to_string(), bob.id).await.unwrap();

    let history = WatchHistoryUseCase::new(env.state.aggregation.clone())
        .execute(bob.id)
        .await
        .unwrap();

    let mut ids: Vec<_> = history.iter().map(|v| v.id).collect();
    ids.sort();
    let mut expected = vec![first.id, second.id];
    expected.sort();
    assert_eq!(ids, expected);
    assert!(history.iter().all(|v| v.owner.as_ref().is_some_and(|o| o.id == ana.id)));
}
