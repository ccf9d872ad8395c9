//! # テスト用データ操作ユースケース
//!
//! E2E テストの前処理として全データを削除する。
//! `ENABLE_TESTING_ROUTES=true` の場合のみルーティングされる。

use std::sync::Arc;

use async_trait::async_trait;
use bloglist_infra::repository::{BlogRepository, UserRepository};

use super::TestingUseCase;
use crate::error::ApiError;

pub struct TestingUseCaseImpl {
    blog_repository: Arc<dyn BlogRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl TestingUseCaseImpl {
    pub fn new(
        blog_repository: Arc<dyn BlogRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            blog_repository,
            user_repository,
        }
    }
}

#[async_trait]
impl TestingUseCase for TestingUseCaseImpl {
    #[tracing::instrument(skip_all)]
    async fn reset(&self) -> Result<(), ApiError> {
        self.blog_repository.delete_all().await?;
        self.user_repository.delete_all().await?;
        tracing::warn!("全データを削除しました");
        Ok(())
    }
}
