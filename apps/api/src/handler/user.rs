//! # ユーザーハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/users` - 一覧（ブログ付き）
//! - `POST /api/users` - 登録
//!
//! レスポンスにパスワードハッシュは含めない。

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use bloglist_domain::user::UserId;
use serde::{Deserialize, Serialize};

use super::blog::BlogSummary;
use crate::{
    error::ApiError,
    usecase::{NewUserInput, UserUseCase, UserWithBlogs},
};

/// ユーザーハンドラの共有状態
pub struct UserState {
    pub usecase: Arc<dyn UserUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// ユーザー登録リクエスト
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name:     Option<String>,
    pub password: Option<String>,
}

/// ユーザーレスポンス
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id:       UserId,
    pub username: String,
    pub name:     Option<String>,
    pub blogs:    Vec<BlogSummary>,
}

impl From<UserWithBlogs> for UserResponse {
    fn from(view: UserWithBlogs) -> Self {
        Self {
            id:       *view.user.id(),
            username: view.user.username().as_str().to_string(),
            name:     view.user.name().map(str::to_string),
            blogs:    view.blogs.iter().map(BlogSummary::from).collect(),
        }
    }
}

// --- ハンドラ ---

/// GET /api/users
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<Arc<UserState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.usecase.list_users().await?;
    Ok(Json(
        users
            .into_iter()
            .map(UserResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/users
#[tracing::instrument(skip_all)]
pub async fn create_user(
    State(state): State<Arc<UserState>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let user = state
        .usecase
        .create_user(NewUserInput {
            username: req.username,
            name:     req.name,
            password: req.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
