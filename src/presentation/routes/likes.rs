use crate::infrastructure::state::AppState;
use crate::presentation::handlers::likes;
use axum::{Router, routing::post};

pub fn routes() -> Router<AppState> {
    Router::new().route("/toggle/v/{id}", post(likes::toggle_video_like))
}
