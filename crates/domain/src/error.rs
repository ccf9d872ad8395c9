//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `MalformedId` | 400 Bad Request | ID の形式不正 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `Forbidden` | 403 Forbidden | 権限不足 |
//!
//! `Validation` のメッセージはそのままクライアントに返すため、
//! 既存クライアントが参照する文言（英語）で組み立てる。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// - 必須フィールドが未入力
    /// - 文字数制限の違反
    /// - 数値の範囲外
    #[error("{0}")]
    Validation(String),

    /// ID として解釈できない文字列
    #[error("malformatted id")]
    MalformedId,

    /// エンティティが見つからない
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// エンティティの種類（"Blog", "User"）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 権限エラー
    ///
    /// 認証（誰か）ではなく認可（何をしてよいか）の失敗を表す。
    #[error("{0}")]
    Forbidden(String),
}
