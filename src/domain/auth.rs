use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Unique token id, keeps two pairs issued in the same second distinct
    pub jti: String,
    /// Token type: "access" or "refresh"
    #[serde(rename = "type")]
    pub token_type: String,
}

impl Claims {
    pub fn new_access_token(user_id: Uuid, expiry_seconds: i64) -> Self {
        Self::new(user_id, ACCESS_TOKEN_TYPE, expiry_seconds)
    }

    pub fn new_refresh_token(user_id: Uuid, expiry_seconds: i64) -> Self {
        Self::new(user_id, REFRESH_TOKEN_TYPE, expiry_seconds)
    }

    fn new(user_id: Uuid, token_type: &str, expiry_seconds: i64) -> Self {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Self {
            sub: user_id.to_string(),
            iat: now,
            exp: now + expiry_seconds,
            jti: Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        }
    }

    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|e| anyhow::anyhow!("Invalid user ID in claims: {}", e))
    }
}

/// A freshly issued access/refresh pair. Never persisted as such.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Failure reported by the token signing collaborator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed or signature invalid")]
    Invalid,
}

/// Authentication failures. Every variant except `UserNotFound` surfaces as 401.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid access token")]
    InvalidToken,
    #[error("Token expired")]
    Expired,
    #[error("Invalid refresh token")]
    SignatureInvalid,
    #[error("Refresh token is expired or used")]
    FingerprintMismatch,
    #[error("Invalid password")]
    InvalidPassword,
    #[error("User not found")]
    UserNotFound,
    #[error("Authentication required")]
    MissingCredentials,
}

/// Token signing collaborator. Access and refresh tokens are signed with
/// distinct keys and lifetimes.
pub trait AuthService: Send + Sync {
    /// Generate an access token for a user
    fn generate_access_token(&self, user_id: Uuid) -> Result<String>;

    /// Generate a refresh token for a user
    fn generate_refresh_token(&self, user_id: Uuid) -> Result<String>;

    /// Validate and decode an access token
    fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError>;

    /// Validate and decode a refresh token
    fn validate_refresh_token(&self, token: &str) -> Result<Claims, TokenError>;

    /// Access token lifetime in seconds
    fn access_token_expiry(&self) -> i64;
}
