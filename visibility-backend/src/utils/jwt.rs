// visibility-backend/src/utils/jwt.rs

use crate::config::{JwtSettings, MIN_JWT_SECRET_LEN};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT関連のエラー
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Failed to decode JWT: {0}")]
    DecodingError(String),

    #[error("JWT token has expired")]
    TokenExpired,

    #[error("Invalid JWT token")]
    InvalidToken,

    #[error("Invalid JWT configuration: {0}")]
    ConfigurationError(String),
}

/// アクセストークンのClaims（発行は認証基盤側で行う）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessTokenClaims {
    /// Subject（社員番号）
    pub sub: String,
    /// ログイン側の数値ID
    pub account_id: i64,
    /// グローバルロール
    #[serde(default)]
    pub role: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT設定
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret_key: String,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    pub fn validate(&self) -> Result<(), JwtError> {
        if self.secret_key.len() < MIN_JWT_SECRET_LEN {
            return Err(JwtError::ConfigurationError(format!(
                "JWT secret key must be at least {} characters",
                MIN_JWT_SECRET_LEN
            )));
        }
        Ok(())
    }
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret_key: settings.secret.clone(),
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
        }
    }
}

/// アクセストークンの検証
pub struct JwtManager {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        config.validate()?;

        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// アクセストークンを検証・デコード
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::DecodingError(e.to_string()),
            })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(JwtError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}
