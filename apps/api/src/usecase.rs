//! # ユースケース層
//!
//! API サーバーのビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **トレイトベースの設計**: ハンドラはトレイト経由で呼び出し、テストではスタブに差し替える
//! - **依存性注入**: リポジトリ・パスワードハッシャー・トークンサービスを外部から注入
//! - **結合はここで行う**: ブログの作成者、ユーザーのブログ一覧はリポジトリから取得した後に組み立てる

pub mod blog;
pub mod login;
pub mod testing;
pub mod user;

use std::sync::Arc;

use async_trait::async_trait;
pub use blog::BlogUseCaseImpl;
use bloglist_domain::{
    blog::{Blog, BlogId},
    password::{PasswordHash, PasswordVerifyResult, PlainPassword},
    user::{User, UserId},
};
use bloglist_infra::PasswordHasher;
pub use login::LoginUseCaseImpl;
pub use testing::TestingUseCaseImpl;
pub use user::UserUseCaseImpl;

use crate::error::ApiError;

/// ブログの作成・更新の入力
///
/// 未指定のフィールドは `None`。必須チェックはユースケースで行う。
#[derive(Debug, Clone, Default)]
pub struct BlogInput {
    pub title:  Option<String>,
    pub author: Option<String>,
    pub url:    Option<String>,
    pub likes:  Option<i64>,
}

/// ユーザー登録の入力
#[derive(Debug, Clone, Default)]
pub struct NewUserInput {
    pub username: Option<String>,
    pub name:     Option<String>,
    pub password: Option<String>,
}

/// 作成者を結合したブログ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogWithCreator {
    pub blog:    Blog,
    pub creator: Option<User>,
}

/// ブログ一覧を結合したユーザー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithBlogs {
    pub user:  User,
    pub blogs: Vec<Blog>,
}

/// ログイン結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutput {
    pub token:    String,
    pub username: String,
    pub name:     Option<String>,
}

/// ブログユースケーストレイト
#[async_trait]
pub trait BlogUseCase: Send + Sync {
    /// 全ブログを作成順に取得する
    async fn list_blogs(&self) -> Result<Vec<BlogWithCreator>, ApiError>;

    /// ブログを 1 件取得する
    async fn get_blog(&self, id: &BlogId) -> Result<BlogWithCreator, ApiError>;

    /// 認証済みユーザーのブログを作成する
    async fn create_blog(
        &self,
        user_id: &UserId,
        input: BlogInput,
    ) -> Result<BlogWithCreator, ApiError>;

    /// ブログを更新する（未指定のフィールドは現状維持）
    async fn update_blog(&self, id: &BlogId, input: BlogInput)
    -> Result<BlogWithCreator, ApiError>;

    /// ブログを削除する（作成者のみ）
    async fn delete_blog(&self, id: &BlogId, user_id: &UserId) -> Result<(), ApiError>;
}

/// ユーザーユースケーストレイト
#[async_trait]
pub trait UserUseCase: Send + Sync {
    /// 全ユーザーをブログ付きで取得する
    async fn list_users(&self) -> Result<Vec<UserWithBlogs>, ApiError>;

    /// ユーザーを登録する
    async fn create_user(&self, input: NewUserInput) -> Result<UserWithBlogs, ApiError>;
}

/// ログインユースケーストレイト
#[async_trait]
pub trait LoginUseCase: Send + Sync {
    /// ユーザー名とパスワードを検証し、アクセストークンを発行する
    async fn login(
        &self,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<LoginOutput, ApiError>;
}

/// テスト用データ操作のユースケーストレイト
#[async_trait]
pub trait TestingUseCase: Send + Sync {
    /// 全ブログ・全ユーザーを削除する
    async fn reset(&self) -> Result<(), ApiError>;
}

/// パスワードをハッシュ化する
///
/// Argon2 の計算はブロッキングスレッドプールで実行する。
pub(crate) async fn hash_password(
    hasher: &Arc<dyn PasswordHasher>,
    password: PlainPassword,
) -> Result<PasswordHash, ApiError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("パスワードハッシュ処理が中断されました: {e}")))?
        .map_err(ApiError::from)
}

/// パスワードをハッシュと照合する
///
/// Argon2 の計算はブロッキングスレッドプールで実行する。
pub(crate) async fn verify_password(
    hasher: &Arc<dyn PasswordHasher>,
    password: PlainPassword,
    hash: PasswordHash,
) -> Result<PasswordVerifyResult, ApiError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("パスワード検証処理が中断されました: {e}")))?
        .map_err(ApiError::from)
}
