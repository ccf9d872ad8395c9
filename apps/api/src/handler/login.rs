//! # ログインハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/login` - ユーザー名とパスワードでアクセストークンを発行
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "token": "eyJhbGciOiJIUzI1NiJ9...",
//!   "username": "mluukkai",
//!   "name": "Matti Luukkainen"
//! }
//! ```

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, usecase::LoginUseCase};

/// ログインハンドラの共有状態
pub struct LoginState {
    pub usecase: Arc<dyn LoginUseCase>,
}

/// ログインリクエスト
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// ログインレスポンス
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token:    String,
    pub username: String,
    pub name:     Option<String>,
}

/// POST /api/login
///
/// 失敗理由（ユーザーなし / パスワード違い）は区別せず 401 を返す。
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<LoginState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let output = state.usecase.login(req.username, req.password).await?;

    Ok(Json(LoginResponse {
        token:    output.token,
        username: output.username,
        name:     output.name,
    }))
}
