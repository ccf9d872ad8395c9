//! # ブログハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/blogs` - 一覧（作成者付き）
//! - `GET /api/blogs/{id}` - 取得
//! - `POST /api/blogs` - 作成（認証必須）
//! - `PUT /api/blogs/{id}` - 更新
//! - `DELETE /api/blogs/{id}` - 削除（認証必須、作成者のみ）

use std::sync::Arc;

use axum::{
    Extension,
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use bloglist_domain::{
    blog::{Blog, BlogId},
    user::{User, UserId},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::AuthenticatedUser,
    usecase::{BlogInput, BlogUseCase, BlogWithCreator},
};

/// ブログハンドラの共有状態
pub struct BlogState {
    pub usecase: Arc<dyn BlogUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// ブログ作成・更新リクエスト
///
/// 必須チェックはユースケースで行うため、すべて任意で受け取る。
#[derive(Debug, Default, Deserialize)]
pub struct BlogRequest {
    pub title:  Option<String>,
    pub author: Option<String>,
    pub url:    Option<String>,
    pub likes:  Option<i64>,
}

impl From<BlogRequest> for BlogInput {
    fn from(req: BlogRequest) -> Self {
        Self {
            title:  req.title,
            author: req.author,
            url:    req.url,
            likes:  req.likes,
        }
    }
}

/// ブログに埋め込む作成者情報
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorSummary {
    pub id:       UserId,
    pub username: String,
    pub name:     Option<String>,
}

impl From<&User> for CreatorSummary {
    fn from(user: &User) -> Self {
        Self {
            id:       *user.id(),
            username: user.username().as_str().to_string(),
            name:     user.name().map(str::to_string),
        }
    }
}

/// ブログレスポンス
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id:     BlogId,
    pub title:  String,
    pub author: Option<String>,
    pub url:    String,
    pub likes:  u64,
    pub user:   Option<CreatorSummary>,
}

impl From<BlogWithCreator> for BlogResponse {
    fn from(view: BlogWithCreator) -> Self {
        let summary = BlogSummary::from(&view.blog);
        Self {
            id:     summary.id,
            title:  summary.title,
            author: summary.author,
            url:    summary.url,
            likes:  summary.likes,
            user:   view.creator.as_ref().map(CreatorSummary::from),
        }
    }
}

/// ユーザーに埋め込むブログ情報（作成者なし）
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogSummary {
    pub id:     BlogId,
    pub title:  String,
    pub author: Option<String>,
    pub url:    String,
    pub likes:  u64,
}

impl From<&Blog> for BlogSummary {
    fn from(blog: &Blog) -> Self {
        Self {
            id:     *blog.id(),
            title:  blog.title().as_str().to_string(),
            author: blog.author().map(str::to_string),
            url:    blog.url().as_str().to_string(),
            likes:  blog.likes().value(),
        }
    }
}

// --- ハンドラ ---

/// GET /api/blogs
#[tracing::instrument(skip_all)]
pub async fn list_blogs(
    State(state): State<Arc<BlogState>>,
) -> Result<impl IntoResponse, ApiError> {
    let blogs = state.usecase.list_blogs().await?;
    Ok(Json(
        blogs
            .into_iter()
            .map(BlogResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /api/blogs/{id}
#[tracing::instrument(skip_all)]
pub async fn get_blog(
    State(state): State<Arc<BlogState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: BlogId = id.parse()?;
    let blog = state.usecase.get_blog(&id).await?;
    Ok(Json(BlogResponse::from(blog)))
}

/// POST /api/blogs
#[tracing::instrument(skip_all)]
pub async fn create_blog(
    State(state): State<Arc<BlogState>>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<BlogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let blog = state.usecase.create_blog(&user.user_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(BlogResponse::from(blog))))
}

/// PUT /api/blogs/{id}
#[tracing::instrument(skip_all)]
pub async fn update_blog(
    State(state): State<Arc<BlogState>>,
    Path(id): Path<String>,
    payload: Result<Json<BlogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id: BlogId = id.parse()?;
    let Json(req) = payload?;
    let blog = state.usecase.update_blog(&id, req.into()).await?;
    Ok(Json(BlogResponse::from(blog)))
}

/// DELETE /api/blogs/{id}
#[tracing::instrument(skip_all)]
pub async fn delete_blog(
    State(state): State<Arc<BlogState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: BlogId = id.parse()?;
    state.usecase.delete_blog(&id, &user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
