//! # テスト用ハンドラ
//!
//! E2E テスト用のデータリセット。`ENABLE_TESTING_ROUTES=true` の場合のみルーティングされる。

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{error::ApiError, usecase::TestingUseCase};

/// テスト用ハンドラの共有状態
pub struct TestingState {
    pub usecase: Arc<dyn TestingUseCase>,
}

/// POST /api/testing/reset
#[tracing::instrument(skip_all)]
pub async fn reset(State(state): State<Arc<TestingState>>) -> Result<impl IntoResponse, ApiError> {
    state.usecase.reset().await?;
    Ok(StatusCode::NO_CONTENT)
}
