//! # ブログユースケース
//!
//! ブログの一覧・取得・作成・更新・削除を実装する。
//!
//! 作成と削除ではブログ本体に加えて、作成者のブログ一覧も更新する。
//! 2 つの書き込みは独立しており、片方のみ失敗した場合の補償は行わない。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bloglist_domain::{
    DomainError,
    blog::{Blog, BlogChanges, BlogId, BlogTitle, BlogUrl, Likes},
    user::{User, UserId},
};
use bloglist_infra::repository::{BlogRepository, UserRepository};

use super::{BlogInput, BlogUseCase, BlogWithCreator};
use crate::error::ApiError;

/// ブログユースケースの実装
pub struct BlogUseCaseImpl {
    blog_repository: Arc<dyn BlogRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl BlogUseCaseImpl {
    pub fn new(
        blog_repository: Arc<dyn BlogRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            blog_repository,
            user_repository,
        }
    }

    async fn find_blog(&self, id: &BlogId) -> Result<Blog, ApiError> {
        self.blog_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| blog_not_found(id).into())
    }

    async fn with_creator(&self, blog: Blog) -> Result<BlogWithCreator, ApiError> {
        let creator = match blog.user_id() {
            Some(user_id) => self.user_repository.find_by_id(user_id).await?,
            None => None,
        };
        Ok(BlogWithCreator { blog, creator })
    }
}

fn blog_not_found(id: &BlogId) -> DomainError {
    DomainError::NotFound {
        entity_type: "Blog",
        id:          id.to_string(),
    }
}

#[async_trait]
impl BlogUseCase for BlogUseCaseImpl {
    #[tracing::instrument(skip_all)]
    async fn list_blogs(&self) -> Result<Vec<BlogWithCreator>, ApiError> {
        let blogs = self.blog_repository.find_all().await?;
        let users: HashMap<UserId, User> = self
            .user_repository
            .find_all()
            .await?
            .into_iter()
            .map(|user| (*user.id(), user))
            .collect();

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let creator = blog.user_id().and_then(|id| users.get(id)).cloned();
                BlogWithCreator { blog, creator }
            })
            .collect())
    }

    #[tracing::instrument(skip_all, fields(%id))]
    async fn get_blog(&self, id: &BlogId) -> Result<BlogWithCreator, ApiError> {
        let blog = self.find_blog(id).await?;
        self.with_creator(blog).await
    }

    #[tracing::instrument(skip_all, fields(%user_id))]
    async fn create_blog(
        &self,
        user_id: &UserId,
        input: BlogInput,
    ) -> Result<BlogWithCreator, ApiError> {
        let Some(user) = self.user_repository.find_by_id(user_id).await? else {
            return Err(ApiError::Unauthorized("user not found".to_string()));
        };

        let blog = Blog::new(
            BlogId::new(),
            BlogTitle::required(input.title)?,
            input.author,
            BlogUrl::required(input.url)?,
            Likes::or_default(input.likes)?,
            Some(*user.id()),
        );

        self.blog_repository.insert(&blog).await?;
        self.user_repository.add_blog(user.id(), blog.id()).await?;

        tracing::info!(blog_id = %blog.id(), "ブログを作成しました");

        let creator = user.with_blog(*blog.id());
        Ok(BlogWithCreator {
            blog,
            creator: Some(creator),
        })
    }

    #[tracing::instrument(skip_all, fields(%id))]
    async fn update_blog(
        &self,
        id: &BlogId,
        input: BlogInput,
    ) -> Result<BlogWithCreator, ApiError> {
        let changes = BlogChanges {
            title:  input.title.map(BlogTitle::new).transpose()?,
            author: input.author,
            url:    input.url.map(BlogUrl::new).transpose()?,
            likes:  input.likes.map(Likes::new).transpose()?,
        };

        let updated = self.find_blog(id).await?.apply(changes);
        if !self.blog_repository.update(&updated).await? {
            return Err(blog_not_found(id).into());
        }

        self.with_creator(updated).await
    }

    #[tracing::instrument(skip_all, fields(%id, %user_id))]
    async fn delete_blog(&self, id: &BlogId, user_id: &UserId) -> Result<(), ApiError> {
        let blog = self.find_blog(id).await?;
        blog.ensure_deletable_by(user_id)?;

        self.blog_repository.delete(id).await?;
        self.user_repository.remove_blog(user_id, id).await?;

        tracing::info!("ブログを削除しました");
        Ok(())
    }
}
