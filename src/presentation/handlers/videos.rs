use crate::application::feed::list_videos::{ListVideosQuery, ListVideosUseCase};
use crate::application::feed::video_detail::VideoDetailUseCase;
use crate::application::feed::views::{VideoDetail, VideoFeedItem};
use crate::application::videos::delete::DeleteVideoUseCase;
use crate::application::videos::publish::{PublishVideoRequest, PublishVideoUseCase};
use crate::application::videos::toggle_publish::TogglePublishUseCase;
use crate::application::videos::update::{UpdateVideoRequest, UpdateVideoUseCase};
use crate::domain::videos::Video;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::AuthUser;
use crate::presentation::handlers::asset_manager;
use crate::presentation::uploads::UploadedFiles;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::pagination::Page;
use crate::shared::query::Qs;
use crate::shared::response::ApiResponse;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
};
use utoipa::ToSchema;

/// Multipart layout of the publish form
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct PublishVideoForm {
    title: String,
    description: String,
    /// Seconds, used when the object store does not report one
    duration: Option<f64>,
    #[schema(value_type = String, format = Binary)]
    video_file: Vec<u8>,
    #[schema(value_type = String, format = Binary)]
    thumbnail: Vec<u8>,
}

/// Multipart layout of the video update form; every part is optional
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct UpdateVideoForm {
    title: Option<String>,
    description: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    thumbnail: Option<Vec<u8>>,
}

#[utoipa::path(
    get,
    path = "/api/v1/videos",
    params(ListVideosQuery),
    responses(
        (status = 200, description = "Published videos", body = ApiResponse<Page<VideoFeedItem>>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Videos"
)]
pub async fn list_videos(
    State(state): State<AppState>,
    _auth: AuthUser,
    Qs(query): Qs<ListVideosQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = ListVideosUseCase::new(state.aggregation.clone())
        .execute(query)
        .await?;

    Ok(ApiResponse::ok(page, "Videos fetched successfully"))
}

#[utoipa::path(
    post,
    path = "/api/v1/videos",
    request_body(content = PublishVideoForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video created unpublished", body = ApiResponse<Video>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Videos"
)]
pub async fn publish_video(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = UploadedFiles::from_multipart(multipart, &state.session.upload_temp_dir).await?;

    let duration = match form.text("duration").map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(
            raw.parse::<f64>()
                .ok()
                .filter(|d| d.is_finite())
                .ok_or_else(|| AppError::ValidationError("Duration must be a number".to_string()))?,
        ),
        None => None,
    };
    let req = PublishVideoRequest {
        title: form.text_or_default("title"),
        description: form.text_or_default("description"),
        duration,
    };
    let video_file = form.take_optional("video_file");
    let thumbnail = form.take_optional("thumbnail");

    let video = PublishVideoUseCase::new(state.videos.clone(), asset_manager(&state))
        .execute(auth.user_id, req, video_file, thumbnail)
        .await?;

    Ok(ApiResponse::created(video, "Video published successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video with likes and channel", body = ApiResponse<VideoDetail>),
        (status = 400, description = "Invalid video id", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Videos"
)]
pub async fn get_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = VideoDetailUseCase::new(
        state.aggregation.clone(),
        state.videos.clone(),
        state.users.clone(),
    )
    .execute(&id, auth.user_id)
    .await?;

    Ok(ApiResponse::ok(detail, "Video fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/videos/{id}",
    params(("id" = String, Path, description = "Video ID")),
    request_body(content = UpdateVideoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video updated", body = ApiResponse<Video>),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Videos"
)]
pub async fn update_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = UploadedFiles::from_multipart(multipart, &state.session.upload_temp_dir).await?;

    let req = UpdateVideoRequest {
        title: form.text("title").map(str::to_string),
        description: form.text("description").map(str::to_string),
    };
    let thumbnail = form.take_optional("thumbnail");

    let video = UpdateVideoUseCase::new(state.videos.clone(), asset_manager(&state))
        .execute(auth.user_id, &id, req, thumbnail)
        .await?;

    Ok(ApiResponse::ok(video, "Video updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/v1/videos/{id}",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted", body = ApiResponse<Video>),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Videos"
)]
pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let video = DeleteVideoUseCase::new(
        state.videos.clone(),
        state.likes.clone(),
        state.comments.clone(),
        asset_manager(&state),
    )
    .execute(auth.user_id, &id)
    .await?;

    Ok(ApiResponse::ok(video, "Video deleted successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/videos/toggle/publish/{id}",
    params(("id" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Publish flag flipped", body = ApiResponse<Video>),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Videos"
)]
pub async fn toggle_publish(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let video = TogglePublishUseCase::new(state.videos.clone())
        .execute(auth.user_id, &id)
        .await?;

    Ok(ApiResponse::ok(video, "Publish status toggled successfully"))
}
