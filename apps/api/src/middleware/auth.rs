//! # 認証ミドルウェア
//!
//! `Authorization: Bearer <token>` ヘッダーのアクセストークンを検証し、
//! 認証済みユーザーをリクエスト extensions に格納する。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let auth_state = AuthState { token_service };
//!
//! Router::new()
//!     .route("/api/blogs", post(create_blog))
//!     .layer(from_fn_with_state(auth_state, require_auth))
//! ```
//!
//! ハンドラでは `Extension<AuthenticatedUser>` で取り出す。

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use bloglist_domain::user::UserId;
use bloglist_infra::TokenService;

use crate::error::ApiError;

/// 認証ミドルウェアの状態
#[derive(Clone)]
pub struct AuthState {
    pub token_service: Arc<dyn TokenService>,
}

/// 検証済みトークンから得た利用者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id:  UserId,
    pub username: String,
}

/// 認証ミドルウェア
///
/// - ヘッダーなし / Bearer 以外 → 401 `token missing`
/// - 署名不正・形式不正 → 401 `token invalid`
/// - 期限切れ → 401 `token expired`
///
/// ユーザーの存在確認は行わない（必要なユースケースで確認する）。
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return ApiError::Unauthorized("token missing".to_string()).into_response();
    };

    let verified = match state.token_service.verify(token) {
        Ok(verified) => verified,
        Err(e) => {
            tracing::debug!(reason = %e, "トークンの検証に失敗しました");
            return ApiError::from(e).into_response();
        }
    };

    tracing::Span::current().record("user_id", tracing::field::display(&verified.user_id));

    request.extensions_mut().insert(AuthenticatedUser {
        user_id:  verified.user_id,
        username: verified.username,
    });

    next.run(request).await
}

/// `Authorization` ヘッダーから Bearer トークンを取り出す
///
/// スキーム名は大文字小文字を区別しない。
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        Router,
        http::{Method, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use bloglist_domain::{clock::FixedClock, user::Username};
    use bloglist_infra::JwtTokenService;
    use bloglist_shared::ErrorResponse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tower::ServiceExt;

    use super::*;

    const SECRET: &str = "test-secret";

    /// テスト用のハンドラ（認証済みユーザー名を返す）
    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.username
    }

    fn token_service() -> Arc<JwtTokenService> {
        Arc::new(JwtTokenService::new(
            SECRET,
            chrono::Duration::hours(1),
            Arc::new(FixedClock::new(chrono::Utc::now())),
        ))
    }

    fn create_test_app() -> Router {
        let auth_state = AuthState {
            token_service: token_service(),
        };

        Router::new()
            .route("/test", get(whoami))
            .layer(from_fn_with_state(auth_state, require_auth))
    }

    fn valid_token() -> String {
        token_service()
            .issue(&UserId::new(), &Username::new("root").unwrap())
            .unwrap()
    }

    async fn send(authorization: Option<String>) -> (StatusCode, String) {
        let mut builder = Request::builder().method(Method::GET).uri("/test");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = create_test_app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[rstest]
    #[case("Bearer")]
    #[case("bearer")]
    #[case("BEARER")]
    #[tokio::test]
    async fn test_有効なトークンはリクエストが通過する(#[case] scheme: &str) {
        let (status, body) = send(Some(format!("{scheme} {}", valid_token()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "root");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic cm9vdDpzZWtyZXQ="))]
    #[case(Some("Bearer "))]
    #[tokio::test]
    async fn test_トークンがなければtoken_missing(#[case] authorization: Option<&str>) {
        let (status, body) = send(authorization.map(str::to_string)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            serde_json::from_str::<ErrorResponse>(&body).unwrap(),
            ErrorResponse::new("token missing")
        );
    }

    #[tokio::test]
    async fn test_不正なトークンはtoken_invalid() {
        let (status, body) = send(Some("Bearer not.a.jwt".to_string())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            serde_json::from_str::<ErrorResponse>(&body).unwrap(),
            ErrorResponse::new("token invalid")
        );
    }

    #[tokio::test]
    async fn test_期限切れのトークンはtoken_expired() {
        let expired_issuer = JwtTokenService::new(
            SECRET,
            chrono::Duration::hours(1),
            Arc::new(FixedClock::new(chrono::Utc::now() - chrono::Duration::hours(2))),
        );
        let token = expired_issuer
            .issue(&UserId::new(), &Username::new("root").unwrap())
            .unwrap();

        let (status, body) = send(Some(format!("Bearer {token}"))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            serde_json::from_str::<ErrorResponse>(&body).unwrap(),
            ErrorResponse::new("token expired")
        );
    }
}
