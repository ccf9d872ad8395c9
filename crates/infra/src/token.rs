//! # アクセストークン
//!
//! ログイン成功時に発行し、保護されたエンドポイントで検証する JWT を扱う。
//!
//! - 署名: HS256（共有シークレット）
//! - クレーム: `sub`（ユーザー ID）、`username`、`iat`、`exp`
//! - 発行時刻は [`Clock`] から取得する（テストで期限切れを再現できる）

use std::sync::Arc;

use bloglist_domain::{
    clock::Clock,
    user::{UserId, Username},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::InfraError;

/// トークンに含めるクレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    pub sub:      String,
    pub username: String,
    pub iat:      i64,
    pub exp:      i64,
}

/// 検証済みトークンから取り出した利用者情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id:  UserId,
    pub username: String,
}

/// トークン検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token invalid")]
    Invalid,
}

/// トークンの発行と検証を担当するトレイト
pub trait TokenService: Send + Sync {
    /// ユーザーに対するトークンを発行する
    fn issue(&self, user_id: &UserId, username: &Username) -> Result<String, InfraError>;

    /// トークンを検証する
    fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError>;
}

/// jsonwebtoken による HS256 実装
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl:          chrono::Duration,
    clock:        Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(secret: &str, ttl: chrono::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: &UserId, username: &Username) -> Result<String, InfraError> {
        let issued_at = self.clock.now();
        let claims = AuthClaims {
            sub:      user_id.to_string(),
            username: username.as_str().to_string(),
            iat:      issued_at.timestamp(),
            exp:      (issued_at + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| InfraError::unexpected(format!("トークンの署名に失敗: {e}")))
    }

    fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // 有効期限は TTL ちょうどで切る
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<AuthClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        let user_id = data.claims.sub.parse().map_err(|_| TokenError::Invalid)?;

        Ok(VerifiedToken {
            user_id,
            username: data.claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use bloglist_domain::clock::{FixedClock, SystemClock};
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    const SECRET: &str = "test-secret";

    fn service_with_clock(clock: Arc<dyn Clock>) -> JwtTokenService {
        JwtTokenService::new(SECRET, Duration::hours(1), clock)
    }

    fn username() -> Username {
        Username::new("mluukkai").unwrap()
    }

    #[test]
    fn test_発行したトークンを検証できる() {
        let sut = service_with_clock(Arc::new(SystemClock));
        let user_id = UserId::new();

        let token = sut.issue(&user_id, &username()).unwrap();
        let verified = sut.verify(&token).unwrap();

        assert_eq!(
            verified,
            VerifiedToken {
                user_id,
                username: "mluukkai".to_string(),
            }
        );
    }

    #[test]
    fn test_別のシークレットで署名されたトークンは無効() {
        let other = JwtTokenService::new("other-secret", Duration::hours(1), Arc::new(SystemClock));
        let token = other.issue(&UserId::new(), &username()).unwrap();

        let sut = service_with_clock(Arc::new(SystemClock));

        assert_eq!(sut.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_期限切れのトークンはexpiredになる() {
        let issued_at = Utc::now() - Duration::hours(2);
        let sut = service_with_clock(Arc::new(FixedClock::new(issued_at)));

        let token = sut.issue(&UserId::new(), &username()).unwrap();

        assert_eq!(sut.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_有効期限を数秒過ぎたトークンもexpiredになる() {
        let issued_at = Utc::now() - Duration::hours(1) - Duration::seconds(5);
        let sut = service_with_clock(Arc::new(FixedClock::new(issued_at)));

        let token = sut.issue(&UserId::new(), &username()).unwrap();

        assert_eq!(sut.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_形式が不正なトークンは無効() {
        let sut = service_with_clock(Arc::new(SystemClock));

        assert_eq!(sut.verify("not.a.jwt"), Err(TokenError::Invalid));
        assert_eq!(sut.verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_クレームに発行時刻と有効期限が入る() {
        let issued_at = Utc::now();
        let sut = service_with_clock(Arc::new(FixedClock::new(issued_at)));

        let token = sut.issue(&UserId::new(), &username()).unwrap();
        let data = jsonwebtoken::decode::<AuthClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(data.claims.iat, issued_at.timestamp());
        assert_eq!(data.claims.exp - data.claims.iat, 3600);
    }
}
