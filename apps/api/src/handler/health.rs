//! # ヘルスチェックハンドラ
//!
//! API サーバーの稼働状態を確認するためのエンドポイント。
//!
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（DynamoDB の接続状態を確認）
//!
//! レスポンス型は [`bloglist_shared::HealthResponse`] / [`bloglist_shared::ReadinessResponse`] を参照。

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use bloglist_infra::dynamodb;
use bloglist_shared::{CheckStatus, HealthResponse, ReadinessResponse};

/// 個別チェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// 依存コンポーネントの疎通確認
#[async_trait]
pub trait DependencyCheck: Send + Sync {
    /// レスポンスの `checks` に使う名前
    fn name(&self) -> &'static str;

    /// 疎通を確認する
    async fn check(&self) -> CheckStatus;
}

/// DynamoDB の疎通確認
pub struct DynamoDbCheck {
    client: Client,
}

impl DynamoDbCheck {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DependencyCheck for DynamoDbCheck {
    fn name(&self) -> &'static str {
        "dynamodb"
    }

    async fn check(&self) -> CheckStatus {
        match dynamodb::check_connection(&self.client).await {
            Ok(()) => CheckStatus::Ok,
            Err(e) => {
                tracing::warn!(error = %e, "DynamoDB の疎通確認に失敗しました");
                CheckStatus::Error
            }
        }
    }
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub checks: Vec<Arc<dyn DependencyCheck>>,
}

/// API サーバーのヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// API サーバーの Readiness Check エンドポイント
///
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let mut checks = BTreeMap::new();
    for dependency in &state.checks {
        let status = tokio::time::timeout(CHECK_TIMEOUT, dependency.check())
            .await
            .unwrap_or_else(|_| {
                tracing::warn!(dependency = dependency.name(), "疎通確認がタイムアウトしました");
                CheckStatus::Error
            });
        checks.insert(dependency.name().to_string(), status);
    }

    let response = ReadinessResponse::from_checks(checks);
    let http_status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(response))
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::Request, routing::get};
    use bloglist_shared::ReadinessStatus;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    struct StubCheck(CheckStatus);

    #[async_trait]
    impl DependencyCheck for StubCheck {
        fn name(&self) -> &'static str {
            "dynamodb"
        }

        async fn check(&self) -> CheckStatus {
            self.0
        }
    }

    async fn call(uri: &str, status: CheckStatus) -> (StatusCode, Vec<u8>) {
        let state = Arc::new(ReadinessState {
            checks: vec![Arc::new(StubCheck(status))],
        });
        let app = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .with_state(state);

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health_checkはhealthyとバージョンを返す() {
        let (status, body) = call("/health", CheckStatus::Error).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<HealthResponse>(&body).unwrap(),
            HealthResponse::healthy(env!("CARGO_PKG_VERSION"))
        );
    }

    #[tokio::test]
    async fn test_依存がすべてokなら200() {
        let (status, body) = call("/health/ready", CheckStatus::Ok).await;

        assert_eq!(status, StatusCode::OK);
        let response: ReadinessResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.status, ReadinessStatus::Ready);
        assert_eq!(response.checks.get("dynamodb"), Some(&CheckStatus::Ok));
    }

    #[tokio::test]
    async fn test_依存が失敗していれば503() {
        let (status, body) = call("/health/ready", CheckStatus::Error).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let response: ReadinessResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(response.status, ReadinessStatus::NotReady);
    }
}
