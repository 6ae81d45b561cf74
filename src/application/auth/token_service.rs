use crate::application::auth::token_utils::hash_token;
use crate::domain::auth::{AuthError, AuthService, Claims, TokenError, TokenPair};
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{User, UserRepository};
use crate::shared::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Issues, verifies and rotates access/refresh pairs.
///
/// A user has at most one live refresh token: its SHA-256 fingerprint is
/// stored on the user record and every issue overwrites it, so a rotated
/// token stops working the moment its successor exists.
#[derive(Clone)]
pub struct TokenService {
    user_repo: Arc<dyn UserRepository>,
    auth_service: Arc<dyn AuthService>,
    password_service: Arc<dyn PasswordHashingService>,
}

impl TokenService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        auth_service: Arc<dyn AuthService>,
        password_service: Arc<dyn PasswordHashingService>,
    ) -> Self {
        Self {
            user_repo,
            auth_service,
            password_service,
        }
    }

    pub fn access_token_expiry(&self) -> i64 {
        self.auth_service.access_token_expiry()
    }

    #[tracing::instrument(skip(self))]
    pub async fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, AppError> {
        let access_token = self.auth_service.generate_access_token(user_id)?;
        let refresh_token = self.auth_service.generate_refresh_token(user_id)?;

        let stored = self
            .user_repo
            .set_refresh_token_hash(user_id, Some(&hash_token(&refresh_token)))
            .await?;

        if !stored {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Signature and expiry only; storage is not consulted.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.auth_service
            .validate_access_token(token)
            .map_err(|e| match e {
                TokenError::Expired => AuthError::Expired,
                TokenError::Invalid => AuthError::InvalidToken,
            })
    }

    #[tracing::instrument(skip_all)]
    pub async fn rotate(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self
            .auth_service
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                TokenError::Expired => AuthError::Expired,
                TokenError::Invalid => AuthError::SignatureInvalid,
            })?;

        let user_id = claims.user_id().map_err(|_| AuthError::SignatureInvalid)?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let fingerprint = hash_token(refresh_token);
        if user.refresh_token_hash.as_deref() != Some(fingerprint.as_str()) {
            tracing::debug!(user_id = %user.id, "refresh token fingerprint mismatch");
            return Err(AuthError::FingerprintMismatch.into());
        }

        self.issue_pair(user.id).await
    }

    /// Clears the stored fingerprint. Revoking twice is fine.
    #[tracing::instrument(skip(self))]
    pub async fn revoke(&self, user_id: Uuid) -> Result<(), AppError> {
        self.user_repo.set_refresh_token_hash(user_id, None).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn verify_credentials(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        password: &str,
    ) -> Result<User, AppError> {
        let username = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_lowercase);
        let email = email.map(str::trim).filter(|e| !e.is_empty());

        if username.is_none() && email.is_none() {
            return Err(AppError::ValidationError(
                "Username or email is required".to_string(),
            ));
        }

        let user = self
            .user_repo
            .find_by_username_or_email(username.as_deref(), email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .password_service
            .verify_password(password, &user.password_hash)?
        {
            return Err(AuthError::InvalidPassword.into());
        }

        Ok(user)
    }
}
