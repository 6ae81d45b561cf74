use crate::application::auth::login::{LoginRequest, LoginResponse, LoginUseCase};
use crate::application::auth::logout::LogoutUseCase;
use crate::application::auth::refresh::{RefreshTokenRequest, RefreshTokenUseCase};
use crate::application::auth::token_utils::TokenResponse;
use crate::application::feed::channel_profile::ChannelProfileUseCase;
use crate::application::feed::views::{ChannelProfile, VideoFeedItem};
use crate::application::feed::watch_history::WatchHistoryUseCase;
use crate::application::users::change_password::{ChangePasswordRequest, ChangePasswordUseCase};
use crate::application::users::current::CurrentUserUseCase;
use crate::application::users::media::{ProfileImage, UpdateProfileImageUseCase};
use crate::application::users::register::{RegisterRequest, RegisterUseCase};
use crate::application::users::update::{UpdateAccountRequest, UpdateAccountUseCase};
use crate::domain::users::User;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::AuthUser;
use crate::presentation::handlers::{asset_manager, token_service};
use crate::presentation::session::{REFRESH_COOKIE, clear_session, set_session};
use crate::presentation::uploads::UploadedFiles;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use crate::shared::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use utoipa::ToSchema;

/// Multipart layout of the registration form
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct RegisterForm {
    full_name: String,
    email: String,
    username: String,
    password: String,
    #[schema(value_type = String, format = Binary)]
    avatar: Vec<u8>,
    #[schema(value_type = Option<String>, format = Binary)]
    cover_image: Option<Vec<u8>>,
}

/// Single-image multipart form; the field is `avatar` or `cover_image`
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ImageForm {
    #[schema(value_type = String, format = Binary)]
    avatar: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body(content = RegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User registered", body = ApiResponse<User>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email taken", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = UploadedFiles::from_multipart(multipart, &state.session.upload_temp_dir).await?;

    let req = RegisterRequest {
        full_name: form.text_or_default("full_name"),
        email: form.text_or_default("email"),
        username: form.text_or_default("username"),
        password: form.text_or_default("password"),
    };
    let avatar = form.take_optional("avatar");
    let cover_image = form.take_optional("cover_image");

    let use_case = RegisterUseCase::new(
        state.users.clone(),
        state.password_service.clone(),
        asset_manager(&state),
    );
    let user = use_case.execute(req, avatar, cover_image).await?;

    Ok(ApiResponse::created(user, "User registered successfully"))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookies set", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = LoginUseCase::new(token_service(&state)).execute(req).await?;
    let jar = set_session(jar, &response.tokens, &state.session);

    Ok((jar, ApiResponse::ok(response, "User logged in successfully")))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses(
        (status = 200, description = "Logged out; session cookies cleared"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    LogoutUseCase::new(token_service(&state))
        .execute(auth.user_id)
        .await?;

    Ok((clear_session(jar, &state.session), ApiResponse::ok(json!({}), "User logged out")))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token pair rotated", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Missing, invalid, expired or used refresh token", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| body.and_then(|Json(b)| b.refresh_token));

    let response = RefreshTokenUseCase::new(token_service(&state))
        .execute(token.as_deref())
        .await?;
    let jar = set_session(jar, &response, &state.session);

    Ok((jar, ApiResponse::ok(response, "Access token refreshed")))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Wrong old password", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    ChangePasswordUseCase::new(state.users.clone(), state.password_service.clone())
        .execute(auth.user_id, req)
        .await?;

    Ok(ApiResponse::ok(json!({}), "Password changed successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    responses(
        (status = 200, description = "Authenticated user", body = ApiResponse<User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = CurrentUserUseCase::new(state.users.clone())
        .execute(auth.user_id)
        .await?;

    Ok(ApiResponse::ok(user, "User fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/update-account",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = ApiResponse<User>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = UpdateAccountUseCase::new(state.users.clone())
        .execute(auth.user_id, req)
        .await?;

    Ok(ApiResponse::ok(user, "Account details updated successfully"))
}

async fn replace_profile_image(
    state: AppState,
    auth: AuthUser,
    multipart: Multipart,
    slot: ProfileImage,
    field: &str,
) -> Result<User, AppError> {
    let mut form = UploadedFiles::from_multipart(multipart, &state.session.upload_temp_dir).await?;
    let file = form.take_required(field)?;

    UpdateProfileImageUseCase::new(state.users.clone(), asset_manager(&state))
        .execute(auth.user_id, slot, file)
        .await
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/avatar",
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar replaced", body = ApiResponse<User>),
        (status = 400, description = "Missing file field", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let user = replace_profile_image(state, auth, multipart, ProfileImage::Avatar, "avatar").await?;
    Ok(ApiResponse::ok(user, "Avatar image updated successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/cover-image",
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Cover image replaced", body = ApiResponse<User>),
        (status = 400, description = "Missing file field", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_cover_image(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let user = replace_profile_image(
        state,
        auth,
        multipart,
        ProfileImage::CoverImage,
        "cover_image",
    )
    .await?;
    Ok(ApiResponse::ok(user, "Cover image updated successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/c/{username}",
    params(("username" = String, Path, description = "Channel username")),
    responses(
        (status = 200, description = "Channel profile", body = ApiResponse<ChannelProfile>),
        (status = 404, description = "Channel does not exist", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn channel_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = ChannelProfileUseCase::new(state.aggregation.clone())
        .execute(&username, Some(auth.user_id))
        .await?;

    Ok(ApiResponse::ok(profile, "User channel fetched successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/history",
    responses(
        (status = 200, description = "Watched videos", body = ApiResponse<Vec<VideoFeedItem>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn watch_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let history = WatchHistoryUseCase::new(state.aggregation.clone())
        .execute(auth.user_id)
        .await?;

    Ok(ApiResponse::ok(history, "Watch history fetched successfully"))
}

