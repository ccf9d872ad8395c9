//! # エラーレスポンス
//!
//! 公開 API で共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - レスポンスボディは `{ "error": "<メッセージ>" }` の 1 フィールドのみ
//!   （既存フロントエンドが `error` キーを参照するため形状を固定する）
//! - axum の `IntoResponse` 変換は API 側の責務（shared に axum 依存を入れない）
//! - よく使うメッセージは便利コンストラクタで提供し、文字列のハードコードを排除

use serde::{Deserialize, Serialize};

/// 内部エラー時にクライアントへ返す固定メッセージ
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   pub error: String,
}

impl ErrorResponse {
   /// 任意のメッセージでエラーレスポンスを作成する
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         error: message.into(),
      }
   }

   /// 未定義のエンドポイントへのアクセス
   pub fn unknown_endpoint() -> Self {
      Self::new("unknown endpoint")
   }

   /// パス上の ID が解釈できない
   pub fn malformatted_id() -> Self {
      Self::new("malformatted id")
   }

   /// 500 Internal Server Error
   ///
   /// メッセージは固定値（内部情報を漏らさないため）。
   pub fn internal_error() -> Self {
      Self::new(INTERNAL_ERROR_MESSAGE)
   }
}
