use crate::domain::auth::{
    ACCESS_TOKEN_TYPE, AuthService, Claims, REFRESH_TOKEN_TYPE, TokenError,
};
use anyhow::Result;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use std::fs;
use uuid::Uuid;

/// Signing material and lifetime for one kind of token
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    expiry: i64,
}

impl TokenKeys {
    /// HS256 keys from a shared secret
    pub fn from_secret(secret: &[u8], expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiry,
        }
    }

    /// ES256 keys from PEM content
    pub fn from_ec_pem(private_key_pem: &[u8], public_key_pem: &[u8], expiry: i64) -> Result<Self> {
        let encoding_key = EncodingKey::from_ec_pem(private_key_pem)
            .map_err(|e| anyhow::anyhow!("Failed to parse private key: {}", e))?;

        let decoding_key = DecodingKey::from_ec_pem(public_key_pem)
            .map_err(|e| anyhow::anyhow!("Failed to parse public key: {}", e))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm: Algorithm::ES256,
            expiry,
        })
    }

    /// ES256 keys loaded from PEM files
    pub fn from_ec_pem_files(private_key_path: &str, public_key_path: &str, expiry: i64) -> Result<Self> {
        let private_key_pem = fs::read(private_key_path)
            .map_err(|e| anyhow::anyhow!("Failed to read private key file: {}", e))?;

        let public_key_pem = fs::read(public_key_path)
            .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?;

        Self::from_ec_pem(&private_key_pem, &public_key_pem, expiry)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to sign {} token: {}", claims.token_type, e))
    }

    fn verify(&self, token: &str, expected_type: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        if token_data.claims.token_type != expected_type {
            return Err(TokenError::Invalid);
        }

        Ok(token_data.claims)
    }
}

/// JWT token signer. Access and refresh tokens use separate keys so one can
/// never be replayed as the other.
pub struct JwtAuthService {
    access: TokenKeys,
    refresh: TokenKeys,
}

impl JwtAuthService {
    pub fn new(access: TokenKeys, refresh: TokenKeys) -> Self {
        Self { access, refresh }
    }

    /// HS256 signer from two secrets
    pub fn from_secrets(
        access_secret: &str,
        access_token_expiry: i64,
        refresh_secret: &str,
        refresh_token_expiry: i64,
    ) -> Self {
        Self::new(
            TokenKeys::from_secret(access_secret.as_bytes(), access_token_expiry),
            TokenKeys::from_secret(refresh_secret.as_bytes(), refresh_token_expiry),
        )
    }
}

impl AuthService for JwtAuthService {
    fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        self.access
            .sign(&Claims::new_access_token(user_id, self.access.expiry))
    }

    fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        self.refresh
            .sign(&Claims::new_refresh_token(user_id, self.refresh.expiry))
    }

    fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.access.verify(token, ACCESS_TOKEN_TYPE)
    }

    fn validate_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.refresh.verify(token, REFRESH_TOKEN_TYPE)
    }

    fn access_token_expiry(&self) -> i64 {
        self.access.expiry
    }
}
