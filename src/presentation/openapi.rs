use crate::application::auth::login::{LoginRequest, LoginResponse};
use crate::application::auth::refresh::RefreshTokenRequest;
use crate::application::auth::token_utils::TokenResponse;
use crate::application::feed::views::{
    AssetUrl, ChannelProfile, ChannelSummary, OwnerSummary, VideoDetail, VideoFeedItem,
};
use crate::application::likes::LikeStatus;
use crate::application::users::change_password::ChangePasswordRequest;
use crate::application::users::update::UpdateAccountRequest;
use crate::domain::assets::RemoteAsset;
use crate::domain::users::User;
use crate::domain::videos::Video;
use crate::presentation::handlers::users::{ImageForm, RegisterForm};
use crate::presentation::handlers::videos::{PublishVideoForm, UpdateVideoForm};
use crate::shared::error::{ErrorDetail, ErrorResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "vidtube API",
        version = "0.1.0",
        description = "Media-sharing backend: accounts, sessions, video assets and feeds.\n\nSuccess bodies use `{status, data, message}`; failures use `{status, message, errors}`."
    ),
    paths(
        crate::presentation::handlers::health::health_check,
        crate::presentation::handlers::users::register,
        crate::presentation::handlers::users::login,
        crate::presentation::handlers::users::logout,
        crate::presentation::handlers::users::refresh_token,
        crate::presentation::handlers::users::change_password,
        crate::presentation::handlers::users::current_user,
        crate::presentation::handlers::users::update_account,
        crate::presentation::handlers::users::update_avatar,
        crate::presentation::handlers::users::update_cover_image,
        crate::presentation::handlers::users::channel_profile,
        crate::presentation::handlers::users::watch_history,
        crate::presentation::handlers::videos::list_videos,
        crate::presentation::handlers::videos::publish_video,
        crate::presentation::handlers::videos::get_video,
        crate::presentation::handlers::videos::update_video,
        crate::presentation::handlers::videos::delete_video,
        crate::presentation::handlers::videos::toggle_publish,
        crate::presentation::handlers::likes::toggle_video_like,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            TokenResponse,
            ChangePasswordRequest,
            UpdateAccountRequest,
            RegisterForm,
            ImageForm,
            PublishVideoForm,
            UpdateVideoForm,
            User,
            Video,
            RemoteAsset,
            AssetUrl,
            OwnerSummary,
            VideoFeedItem,
            ChannelProfile,
            ChannelSummary,
            VideoDetail,
            LikeStatus,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Users", description = "Accounts, sessions and channels"),
        (name = "Videos", description = "Video publishing and feeds"),
        (name = "Likes", description = "Video likes")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("accessToken"))),
            );
        }
    }
}
