use crate::application::auth::token_utils::TokenResponse;
use crate::infrastructure::config::SessionConfig;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

fn session_cookie(name: &'static str, value: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Sets both session cookies from a freshly issued pair.
pub fn set_session(jar: CookieJar, tokens: &TokenResponse, config: &SessionConfig) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, tokens.access_token.clone(), config))
        .add(session_cookie(REFRESH_COOKIE, tokens.refresh_token.clone(), config))
}

/// Overwrites both cookies with expired blanks, whether or not the request
/// carried them.
pub fn clear_session(jar: CookieJar, config: &SessionConfig) -> CookieJar {
    let expired = |name| {
        let mut cookie = session_cookie(name, String::new(), config);
        cookie.make_removal();
        cookie
    };
    jar.add(expired(ACCESS_COOKIE)).add(expired(REFRESH_COOKIE))
}
