//! # 未定義エンドポイント
//!
//! ルートにも静的ファイルにも一致しないリクエストへの応答。

use axum::{Json, http::StatusCode, response::IntoResponse};
use bloglist_shared::ErrorResponse;

/// 404 `unknown endpoint` を返す
pub async fn unknown_endpoint() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::unknown_endpoint()))
}
