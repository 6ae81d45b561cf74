use crate::common::{TEST_PASSWORD, TestEnv};
use vidtube::application::auth::TokenService;
use vidtube::application::auth::login::{LoginRequest, LoginUseCase};
use vidtube::application::auth::logout::LogoutUseCase;
use vidtube::application::auth::refresh::RefreshTokenUseCase;
use std::sync::Arc;
use vidtube::domain::auth::AuthError;
use vidtube::infrastructure::auth::JwtAuthService;
use vidtube::shared::error::AppError;

fn token_service(env: &TestEnv) -> TokenService {
    TokenService::new(
        env.state.users.clone(),
        env.state.auth_service.clone(),
        env.state.password_service.clone(),
    )
}

#[tokio::test]
async fn test_verify_credentials_by_username_or_email() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let tokens = token_service(&env);

    let by_name = tokens
        .verify_credentials(Some("ANA"), None, TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(by_name.id, ana.id);

    let by_email = tokens
        .verify_credentials(None, Some("ana@example.com"), TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(by_email.id, ana.id);
}

#[tokio::test]
async fn test_verify_credentials_wrong_password() {
    let env = TestEnv::new();
    env.seed_user("ana").await;

    let result = token_service(&env)
        .verify_credentials(Some("ana"), None, "nope")
        .await;

    assert!(matches!(
        result,
        Err(AppError::Auth(AuthError::InvalidPassword))
    ));
}

#[tokio::test]
async fn test_verify_credentials_unknown_user() {
    let env = TestEnv::new();

    let result = token_service(&env)
        .verify_credentials(Some("ghost"), None, TEST_PASSWORD)
        .await;

    assert!(matches!(result, Err(AppError::Auth(AuthError::UserNotFound))));
}

#[tokio::test]
async fn test_login_returns_user_and_pair() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;

    let response = LoginUseCase::new(token_service(&env))
        .execute(LoginRequest {
            username: Some("ana".to_string()),
            email: None,
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.user.id, ana.id);
    assert_eq!(response.tokens.token_type, "Bearer");
    assert_eq!(response.tokens.expires_in, 900);

    let json = serde_json::to_value(&response).unwrap();
    assert!(json["user"].get("password_hash").is_none());
    assert!(json["access_token"].is_string());
}

#[tokio::test]
async fn test_rotated_refresh_token_is_rejected() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let tokens = token_service(&env);
    let first = tokens.issue_pair(ana.id).await.unwrap();

    let refresh = RefreshTokenUseCase::new(tokens.clone());
    let second = refresh.execute(Some(&first.refresh_token)).await.unwrap();
    assert_ne!(second.refresh_token, first.refresh_token);

    let replay = refresh.execute(Some(&first.refresh_token)).await;
    assert!(matches!(
        replay,
        Err(AppError::Auth(AuthError::FingerprintMismatch))
    ));

    assert!(refresh.execute(Some(&second.refresh_token)).await.is_ok());
}

#[tokio::test]
async fn test_expired_tokens_are_rejected_as_expired() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let tokens = TokenService::new(
        env.state.users.clone(),
        Arc::new(JwtAuthService::from_secrets(
            "access-secret",
            -120,
            "refresh-secret",
            -120,
        )),
        env.state.password_service.clone(),
    );
    let pair = tokens.issue_pair(ana.id).await.unwrap();

    assert_eq!(
        tokens.verify_access(&pair.access_token).unwrap_err(),
        AuthError::Expired
    );
    assert!(matches!(
        tokens.rotate(&pair.refresh_token).await,
        Err(AppError::Auth(AuthError::Expired))
    ));
    assert!(matches!(
        RefreshTokenUseCase::new(tokens.clone())
            .execute(Some(&pair.refresh_token))
            .await,
        Err(AppError::Auth(AuthError::Expired))
    ));
}

#[tokio::test]
async fn test_refresh_without_token() {
    let env = TestEnv::new();
    let refresh = RefreshTokenUseCase::new(token_service(&env));

    assert!(matches!(
        refresh.execute(None).await,
        Err(AppError::Auth(AuthError::MissingCredentials))
    ));
    assert!(matches!(
        refresh.execute(Some("")).await,
        Err(AppError::Auth(AuthError::MissingCredentials))
    ));
}

#[tokio::test]
async fn test_refresh_with_garbage_token() {
    let env = TestEnv::new();

    let result = RefreshTokenUseCase::new(token_service(&env))
        .execute(Some("not.a.jwt"))
        .await;

    assert!(matches!(
        result,
        Err(AppError::Auth(AuthError::SignatureInvalid))
    ));
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let env = TestEnv::new();
    let ana = env.seed_user("ana").await;
    let tokens = token_service(&env);
    let pair = tokens.issue_pair(ana.id).await.unwrap();

    LogoutUseCase::new(tokens.clone())
        .execute(ana.id)
        .await
        .unwrap();

    let result = tokens.rotate(&pair.refresh_token).await;
    assert!(matches!(
        result,
        Err(AppError::Auth(AuthError::FingerprintMismatch))
    ));

    // access tokens stay valid until they expire
    assert!(tokens.verify_access(&pair.access_token).is_ok());
}
