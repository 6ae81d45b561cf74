use vidtube::infrastructure::auth::JwtAuthService;
use vidtube::infrastructure::config::AppConfig;
use vidtube::infrastructure::state::AppState;
use vidtube::infrastructure::storage::{S3Config, S3ObjectStore};
use vidtube::infrastructure;
use vidtube::presentation;

use aws_config::BehaviorVersion;
use dotenvy::dotenv;
use std::env;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    run(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

fn init_tracing() {
    // try_init: tests may call this more than once
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "vidtube=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

async fn run<F>(config: AppConfig, shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (listener, app) = bootstrap(&config).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    Ok(())
}

async fn bootstrap(config: &AppConfig) -> anyhow::Result<(tokio::net::TcpListener, axum::Router)> {
    let pool = infrastructure::db::create_pool(&config.database_url).await?;

    sqlx::migrate!().run(&pool).await?;

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let object_store = S3ObjectStore::new(
        Arc::new(aws_sdk_s3::Client::new(&aws)),
        S3Config::new(config.s3_bucket.clone(), config.s3_base_url.clone()),
    );

    let auth_service = JwtAuthService::from_secrets(
        &config.access_token_secret,
        config.access_token_expiry,
        &config.refresh_token_secret,
        config.refresh_token_expiry,
    );

    let state = AppState::postgres(
        pool,
        Arc::new(object_store),
        Arc::new(auth_service),
        config.session.clone(),
    );
    let app = presentation::router::app(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::debug!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    Ok((listener, app))
}
