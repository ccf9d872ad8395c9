//! # インフラ層エラー定義
//!
//! DynamoDB やパスワードハッシュ、トークン署名で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! AWS SDK のエラー型はジェネリクスが深く `#[from]` が困難なため、
//! 呼び出し側で文脈付きの String にマップしてから convenience constructor に渡す。
//! constructor がその時点のスパン情報を自動でキャプチャする。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::Conflict { entity, key } => { /* 一意制約違反 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// DynamoDB への操作で発生するエラー
    #[error("DynamoDB エラー: {0}")]
    DynamoDb(String),

    /// 一意制約違反（条件付き書き込みの失敗）
    #[error("競合が発生しました: {entity}(key={key})")]
    Conflict {
        /// エンティティ名（例: "User"）
        entity: String,
        /// 衝突したキー
        key:    String,
    },

    /// 永続化されたデータがドメインモデルに変換できない
    #[error("不正な保存データ: {0}")]
    InvalidData(String),

    /// パスワードハッシュの生成・解析エラー
    #[error("パスワードハッシュエラー: {0}")]
    PasswordHash(String),

    /// 上記に分類できない予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl InfraError {
    fn from_kind(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// Conflict の場合、entity と key を返す
    pub fn as_conflict(&self) -> Option<(&str, &str)> {
        match &self.kind {
            InfraErrorKind::Conflict { entity, key } => Some((entity.as_str(), key.as_str())),
            _ => None,
        }
    }

    // ===== Convenience constructors =====

    pub fn dynamo_db(msg: impl Into<String>) -> Self {
        Self::from_kind(InfraErrorKind::DynamoDb(msg.into()))
    }

    pub fn conflict(entity: impl Into<String>, key: impl Into<String>) -> Self {
        Self::from_kind(InfraErrorKind::Conflict {
            entity: entity.into(),
            key:    key.into(),
        })
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::from_kind(InfraErrorKind::InvalidData(msg.into()))
    }

    pub fn password_hash(msg: impl Into<String>) -> Self {
        Self::from_kind(InfraErrorKind::PasswordHash(msg.into()))
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::from_kind(InfraErrorKind::Unexpected(msg.into()))
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// ErrorLayer 付き subscriber の下で実行する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn test_dynamo_dbでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_find_blog");
            let _enter = span.enter();

            let err = InfraError::dynamo_db("接続失敗");

            assert!(matches!(err.kind(), InfraErrorKind::DynamoDb(msg) if msg == "接続失敗"));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_find_blog"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_conflictの情報を取得できる() {
        let err = InfraError::conflict("User", "root");

        assert_eq!(err.as_conflict(), Some(("User", "root")));
        assert_eq!(format!("{err}"), "競合が発生しました: User(key=root)");
    }

    #[test]
    fn test_conflict以外のas_conflictはnone() {
        assert!(InfraError::unexpected("test").as_conflict().is_none());
        assert!(InfraError::invalid_data("likes").as_conflict().is_none());
    }

    #[test]
    fn test_password_hashのdisplay() {
        let err = InfraError::password_hash("不正な形式");
        assert_eq!(format!("{err}"), "パスワードハッシュエラー: 不正な形式");
    }
}
