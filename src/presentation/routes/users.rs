use crate::infrastructure::state::AppState;
use crate::presentation::handlers::users;
use crate::presentation::middleware::rate_limit::custom_rate_limit_layer;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};

/// User routes; the credential endpoints sit behind the rate limiter and
/// the image uploads are bounded by `max_upload_bytes`
pub fn routes(requests_per_minute: u64, max_upload_bytes: usize) -> anyhow::Result<Router<AppState>> {
    let upload_limit = DefaultBodyLimit::max(max_upload_bytes);

    let credentials = Router::new()
        .route("/register", post(users::register).layer(upload_limit))
        .route("/login", post(users::login))
        .route("/refresh-token", post(users::refresh_token))
        .layer(custom_rate_limit_layer(requests_per_minute)?);

    Ok(Router::new()
        .merge(credentials)
        .route("/logout", post(users::logout))
        .route("/change-password", post(users::change_password))
        .route("/current-user", get(users::current_user))
        .route("/update-account", patch(users::update_account))
        .route("/avatar", patch(users::update_avatar).layer(upload_limit))
        .route("/cover-image", patch(users::update_cover_image).layer(upload_limit))
        .route("/c/{username}", get(users::channel_profile))
        .route("/history", get(users::watch_history)))
}
