use std::env;
use std::path::PathBuf;

/// Process configuration, read once at startup from the environment
/// (after `dotenvy` has loaded `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub access_token_secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_secret: String,
    pub refresh_token_expiry: i64,
    pub s3_bucket: String,
    pub s3_base_url: String,
    pub session: SessionConfig,
}

/// Settings the session boundary needs per request
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub upload_temp_dir: PathBuf,
    pub cookie_secure: bool,
    pub rate_limit_per_minute: u64,
    /// Comma-separated; empty or `*` allows any origin
    pub cors_allowed_origins: String,
    /// Body limit for the multipart upload routes
    pub max_upload_bytes: usize,
}

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            upload_temp_dir: PathBuf::from("./public/temp"),
            cookie_secure: true,
            rate_limit_per_minute: 60,
            cors_allowed_origins: String::new(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let access_token_secret = env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("ACCESS_TOKEN_SECRET must be set"))?;
        let refresh_token_secret = env::var("REFRESH_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("REFRESH_TOKEN_SECRET must be set"))?;

        if access_token_secret == refresh_token_secret {
            anyhow::bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ");
        }

        Ok(Self {
            database_url,
            port: parse_or("PORT", 8000),
            access_token_secret,
            access_token_expiry: parse_or("ACCESS_TOKEN_EXPIRY", 900),
            refresh_token_secret,
            refresh_token_expiry: parse_or("REFRESH_TOKEN_EXPIRY", 864000),
            s3_bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "vidtube-media".to_string()),
            s3_base_url: env::var("S3_BASE_URL")
                .unwrap_or_else(|_| "https://s3.amazonaws.com".to_string()),
            session: SessionConfig {
                upload_temp_dir: env::var("UPLOAD_TEMP_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./public/temp")),
                cookie_secure: parse_or("COOKIE_SECURE", true),
                rate_limit_per_minute: parse_or("RATE_LIMIT_PER_MINUTE", 60),
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
                max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
