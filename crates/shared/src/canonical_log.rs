//! # Canonical Log Line ミドルウェア
//!
//! HTTP リクエスト完了時に、そのリクエストの要点（メソッド、パス、ステータス、
//! レイテンシ）を 1 行に集約したサマリログを出力する tower Layer。
//!
//! ## TraceLayer との責務分離
//!
//! - TraceLayer: スパン作成（method, uri, request_id）
//! - CanonicalLogLineLayer: リクエスト完了サマリ
//!
//! TraceLayer の内側に配置することで、スパンフィールドが JSON ログに
//! 自動的に含まれる。リクエストボディはログに出さない（パスワードを含むため）。

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response};
use tower::{Layer, Service};

/// ヘルスチェックパスかどうかを判定する
fn is_health_check_path(path: &str) -> bool {
    path == "/health" || path.starts_with("/health/")
}

/// Canonical Log Line を出力する Layer
///
/// ```text
/// TraceLayer → CanonicalLogLineLayer → [他のミドルウェア] → handler
/// ```
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

/// [`CanonicalLogLineLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // clone-swap: poll_ready 済みの inner を使う
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let path = req.uri().path().to_owned();
        if is_health_check_path(&path) {
            return Box::pin(async move { inner.call(req).await });
        }

        let method = req.method().to_string();
        let started = Instant::now();

        Box::pin(async move {
            let result = inner.call(req).await;
            let outcome = match &result {
                Ok(response) => Ok(response.status().as_u16()),
                Err(err) => Err(err.to_string()),
            };
            emit_canonical_line(&method, &path, started.elapsed().as_millis() as u64, outcome);
            result
        })
    }
}

/// リクエスト完了サマリを 1 行出力する
///
/// 5xx と Service エラーは ERROR、それ以外は INFO。
fn emit_canonical_line(method: &str, path: &str, latency_ms: u64, outcome: Result<u16, String>) {
    match outcome {
        Ok(status) if status >= 500 => tracing::error!(
            log.r#type = "canonical",
            http.method = method,
            http.path = path,
            http.status_code = status,
            http.latency_ms = latency_ms,
            "リクエスト完了（サーバーエラー）"
        ),
        Ok(status) => tracing::info!(
            log.r#type = "canonical",
            http.method = method,
            http.path = path,
            http.status_code = status,
            http.latency_ms = latency_ms,
            "リクエスト完了"
        ),
        Err(message) => tracing::error!(
            log.r#type = "canonical",
            http.method = method,
            http.path = path,
            http.latency_ms = latency_ms,
            error.message = %message,
            "リクエスト処理エラー"
        ),
    }
}
