//! # Bloglist インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **ドキュメントストア**: DynamoDB クライアントの作成とテーブル準備
//! - **リポジトリ実装**: ユーザー・ブログの永続化
//! - **パスワードハッシュ**: Argon2id によるハッシュ化と検証
//! - **アクセストークン**: JWT の発行と検証
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//!   ↘
//!     shared
//! ```
//!
//! ドメイン層はインフラ層に依存しない。
//!
//! ## モジュール構成
//!
//! - [`dynamodb`] - DynamoDB 接続管理・テーブル準備
//! - [`error`] - インフラ層エラー定義
//! - [`password`] - パスワードハッシュ
//! - [`repository`] - リポジトリ実装
//! - [`token`] - アクセストークン
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use bloglist_infra::{
//!     dynamodb::{self, TableNames},
//!     repository::{DynamoDbBlogRepository, BlogRepository},
//! };
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = dynamodb::create_client(Some("http://localhost:8000"), "ap-northeast-1").await;
//!     let tables = TableNames::with_prefix("bloglist");
//!     dynamodb::ensure_tables(&client, &tables).await?;
//!
//!     let blogs = DynamoDbBlogRepository::new(client, &tables);
//!     let all = blogs.find_all().await?;
//!     Ok(())
//! }
//! ```

pub mod dynamodb;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod password;
pub mod repository;
pub mod token;

pub use error::{InfraError, InfraErrorKind};
pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use token::{JwtTokenService, TokenError, TokenService, VerifiedToken};
