use crate::common::{TestEnv, generate_test_token};
use crate::support::{app, bearer_request, body_json, send};
use axum::http::StatusCode;

#[tokio::test]
async fn test_toggle_like_route() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let bob = env.seed_user("bob").await;
    let video = env.seed_video(ana.id, "live", true).await;
    let token = generate_test_token(bob.id);
    let app = app(&env.state);
    let uri = format!("/api/v1/likes/toggle/v/{}", video.id);

    let liked = send(&app, bearer_request("POST", &uri, &token)).await;
    assert_eq!(liked.status(), StatusCode::OK);
    assert_eq!(body_json(liked).await["data"]["is_liked"], true);

    let unliked = body_json(send(&app, bearer_request("POST", &uri, &token)).await).await;
    assert_eq!(unliked["data"]["is_liked"], false);
    assert_eq!(env.store.like_count(video.id), 0);
}

#[tokio::test]
async fn test_toggle_like_requires_session() {
    let env = TestEnv::new();
    let app = app(&env.state);

    let response = send(
        &app,
        axum::http::Request::builder()
            .method("POST")
            .uri("/api/v1/likes/toggle/v/00000000-0000-0000-0000-000000000000")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
