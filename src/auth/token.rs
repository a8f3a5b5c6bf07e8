use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::errors::AppError;

/// JWT claims carried by session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's login name.
    pub sub: String,
    pub user_code: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_login: &str, user_code: &str, ttl_minutes: i64) -> Self {
        let now = Utc::now().timestamp();
        Claims {
            sub: user_login.to_string(),
            user_code: user_code.to_string(),
            iat: now,
            exp: now.saturating_add(ttl_minutes.saturating_mul(60)),
        }
    }
}

/// Sign a token for the given user.
pub fn issue_token(cfg: &AuthConfig, user_login: &str, user_code: &str) -> Result<String, AppError> {
    let claims = Claims::new(user_login, user_code, cfg.token_ttl_minutes);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )
    .map_err(|e| AppError::Hash(format!("Failed to sign token: {e}")))
}

/// Check signature and expiry; no revocation list is consulted.
pub fn verify_token(cfg: &AuthConfig, token: &str) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {e}")))?;
    Ok(data.claims)
}
