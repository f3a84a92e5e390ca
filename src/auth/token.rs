use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

/// 令牌中携带的身份信息
///
/// 校验时不会回查数据库，所以 `role` 是签发时的角色。
/// 登录后角色被修改，需要重新登录才会生效。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub role: i32,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 签名密钥和有效期
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiration())
    }

    /// 签发令牌，返回令牌和过期时间戳
    pub fn issue(&self, id: i64, username: &str, role: i32) -> Result<(String, i64), AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id,
            username: username.to_owned(),
            role,
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))?;

        Ok((token, claims.exp))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AppError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR_HOURS: Duration = Duration::from_secs(4 * 3600);

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let keys = TokenKeys::new("secret", FOUR_HOURS);
        let (token, expires_at) = keys.issue(7, "alice", 3).unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, 3);
        assert_eq!(claims.exp, expires_at);
        assert_eq!(claims.exp - claims.iat, 4 * 3600);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let keys = TokenKeys::new("secret", FOUR_HOURS);
        let other = TokenKeys::new("another-secret", FOUR_HOURS);
        let (token, _) = other.issue(1, "mallory", 1).unwrap();

        assert!(matches!(keys.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_expired_token() {
        let keys = TokenKeys::new("secret", FOUR_HOURS);
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: 1,
            username: "alice".into(),
            role: 3,
            iat: now - 5 * 3600,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(matches!(keys.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_truncated_and_garbage_tokens() {
        let keys = TokenKeys::new("secret", FOUR_HOURS);
        let (token, _) = keys.issue(1, "alice", 3).unwrap();
        let truncated = &token[..token.len() / 2];

        assert!(matches!(keys.verify(truncated), Err(AppError::InvalidToken)));
        assert!(matches!(keys.verify(""), Err(AppError::InvalidToken)));
        assert!(matches!(keys.verify("not.a.token"), Err(AppError::InvalidToken)));
    }
}
