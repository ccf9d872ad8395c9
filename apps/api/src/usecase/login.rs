//! # ログインユースケース
//!
//! ユーザー名とパスワードを検証し、アクセストークンを発行する。
//!
//! ## タイミング攻撃対策
//!
//! ユーザーが存在しない場合もダミーハッシュで検証を実行し、
//! 処理時間を均一化する。失敗理由はクライアントに区別させない。

use std::sync::Arc;

use async_trait::async_trait;
use bloglist_domain::{
    password::{PasswordHash, PlainPassword},
    user::Username,
};
use bloglist_infra::{
    PasswordHasher,
    TokenService,
    password::DUMMY_PASSWORD_HASH,
    repository::UserRepository,
};

use super::{LoginOutput, LoginUseCase, verify_password};
use crate::error::ApiError;

/// 認証失敗時のメッセージ
pub const INVALID_CREDENTIALS: &str = "invalid username or password";

/// ログインユースケースの実装
pub struct LoginUseCaseImpl {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_service:   Arc<dyn TokenService>,
}

impl LoginUseCaseImpl {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_service: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_service,
        }
    }

    /// ダミーハッシュで検証を実行する（タイミング攻撃対策）
    async fn dummy_verification(&self, password: PlainPassword) {
        let dummy_hash = PasswordHash::new(DUMMY_PASSWORD_HASH);
        // 結果は無視（エラーでも問題ない）
        let _ = verify_password(&self.password_hasher, password, dummy_hash).await;
    }
}

#[async_trait]
impl LoginUseCase for LoginUseCaseImpl {
    #[tracing::instrument(skip_all)]
    async fn login(
        &self,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<LoginOutput, ApiError> {
        let password = PlainPassword::new(password.unwrap_or_default());

        // 形式が不正なユーザー名は存在しないユーザーと同じ扱い
        let user = match Username::required(username) {
            Ok(username) => self.user_repository.find_by_username(&username).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            self.dummy_verification(password).await;
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let verified =
            verify_password(&self.password_hasher, password, user.password_hash().clone()).await?;
        if verified.is_mismatch() {
            tracing::info!(user_id = %user.id(), "パスワードが一致しません");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .token_service
            .issue(user.id(), user.username())
            .map_err(|e| ApiError::Internal(format!("トークンの発行に失敗: {e}")))?;

        tracing::info!(user_id = %user.id(), "ログインしました");

        Ok(LoginOutput {
            token,
            username: user.username().as_str().to_string(),
            name: user.name().map(str::to_string),
        })
    }
}
