use crate::application::likes::{LikeStatus, ToggleLikeUseCase};
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::AuthUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

#[utoipa::path(
    post,
    path = "/api/v1/likes/toggle/v/{id}",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Like added or removed", body = ApiResponse<LikeStatus>),
        (status = 400, description = "Invalid video id", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Likes"
)]
pub async fn toggle_video_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let status = ToggleLikeUseCase::new(state.videos.clone(), state.likes.clone())
        .execute(auth.user_id, &id)
        .await?;

    let message = if status.is_liked {
        "Video liked"
    } else {
        "Video unliked"
    };
    Ok(ApiResponse::ok(status, message))
}
