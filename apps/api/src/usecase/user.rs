//! # ユーザーユースケース
//!
//! ユーザーの一覧取得と登録を実装する。
//!
//! 登録時の検証順序は既存クライアントが期待するとおり
//! パスワード（未入力 → 文字数）→ ユーザー名（未入力 → 文字数）→ 一意性。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bloglist_domain::{
    blog::{Blog, BlogId},
    password::PlainPassword,
    user::{User, UserId, Username},
};
use bloglist_infra::{
    PasswordHasher,
    repository::{BlogRepository, UserRepository},
};

use super::{NewUserInput, UserUseCase, UserWithBlogs, hash_password};
use crate::error::ApiError;

/// ユーザーユースケースの実装
pub struct UserUseCaseImpl {
    user_repository: Arc<dyn UserRepository>,
    blog_repository: Arc<dyn BlogRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserUseCaseImpl {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        blog_repository: Arc<dyn BlogRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            blog_repository,
            password_hasher,
        }
    }
}

#[async_trait]
impl UserUseCase for UserUseCaseImpl {
    #[tracing::instrument(skip_all)]
    async fn list_users(&self) -> Result<Vec<UserWithBlogs>, ApiError> {
        let users = self.user_repository.find_all().await?;
        let blogs: HashMap<BlogId, Blog> = self
            .blog_repository
            .find_all()
            .await?
            .into_iter()
            .map(|blog| (*blog.id(), blog))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let user_blogs = user
                    .blogs()
                    .iter()
                    .filter_map(|id| blogs.get(id))
                    .cloned()
                    .collect();
                UserWithBlogs {
                    user,
                    blogs: user_blogs,
                }
            })
            .collect())
    }

    #[tracing::instrument(skip_all)]
    async fn create_user(&self, input: NewUserInput) -> Result<UserWithBlogs, ApiError> {
        let password = PlainPassword::for_registration(input.password)?;
        let username = Username::required(input.username)?;

        let password_hash = hash_password(&self.password_hasher, password).await?;
        let user = User::new(UserId::new(), username, input.name, password_hash);

        self.user_repository.insert(&user).await?;

        tracing::info!(user_id = %user.id(), "ユーザーを登録しました");

        Ok(UserWithBlogs {
            user,
            blogs: Vec::new(),
        })
    }
}
