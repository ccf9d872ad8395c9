//! # API エラー定義
//!
//! API サーバー固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンスボディは [`ErrorResponse`]（`{"error": "<メッセージ>"}`）。
//! 5xx の場合は固定メッセージを返し、詳細はログにのみ出力する。

use axum::{
   Json,
   extract::rejection::JsonRejection,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use bloglist_domain::DomainError;
use bloglist_infra::{InfraError, TokenError};
use bloglist_shared::ErrorResponse;
use thiserror::Error;

/// ユーザー名の一意制約違反時のメッセージ
pub const USERNAME_NOT_UNIQUE: &str = "expected `username` to be unique";

/// API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// 入力値の不備（400）
   #[error("{0}")]
   BadRequest(String),

   /// 認証失敗（401）
   #[error("{0}")]
   Unauthorized(String),

   /// 権限不足（403）
   #[error("{0}")]
   Forbidden(String),

   /// リソースが存在しない（404）
   #[error("{0}")]
   NotFound(String),

   /// データベースエラー（500）
   #[error("データベースエラー: {0}")]
   Database(InfraError),

   /// 内部エラー（500）
   #[error("内部エラー: {0}")]
   Internal(String),
}

impl From<DomainError> for ApiError {
   fn from(err: DomainError) -> Self {
      match err {
         DomainError::Validation(message) => Self::BadRequest(message),
         DomainError::MalformedId => Self::BadRequest(err.to_string()),
         DomainError::NotFound { entity_type, .. } => {
            Self::NotFound(format!("{} not found", entity_type.to_lowercase()))
         }
         DomainError::Forbidden(message) => Self::Forbidden(message),
      }
   }
}

impl From<InfraError> for ApiError {
   fn from(err: InfraError) -> Self {
      match err.as_conflict() {
         Some(("User", _)) => Self::BadRequest(USERNAME_NOT_UNIQUE.to_string()),
         _ => Self::Database(err),
      }
   }
}

impl From<JsonRejection> for ApiError {
   fn from(rejection: JsonRejection) -> Self {
      Self::BadRequest(rejection.body_text())
   }
}

impl From<TokenError> for ApiError {
   fn from(err: TokenError) -> Self {
      Self::Unauthorized(err.to_string())
   }
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      let (status, body) = match &self {
         ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
         ApiError::Unauthorized(message) => {
            (StatusCode::UNAUTHORIZED, ErrorResponse::new(message))
         }
         ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, ErrorResponse::new(message)),
         ApiError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::new(message)),
         ApiError::Database(e) => {
            tracing::error!(
               error.kind = "database",
               span_trace = %e.span_trace(),
               "データベースエラー: {}",
               e
            );
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               ErrorResponse::internal_error(),
            )
         }
         ApiError::Internal(message) => {
            tracing::error!(error.kind = "internal", "内部エラー: {}", message);
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               ErrorResponse::internal_error(),
            )
         }
      };

      (status, Json(body)).into_response()
   }
}
