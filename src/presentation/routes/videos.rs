use crate::infrastructure::state::AppState;
use crate::presentation::handlers::videos;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch},
};

/// Video routes; `max_upload_bytes` bounds the multipart bodies
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::publish_video))
        .route(
            "/{id}",
            get(videos::get_video)
                .patch(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/toggle/publish/{id}", patch(videos::toggle_publish))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
