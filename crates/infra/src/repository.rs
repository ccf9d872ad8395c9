//! # リポジトリ実装
//!
//! ユーザーとブログの永続化を担当するリポジトリを提供する。
//!
//! ## 設計方針
//!
//! - **トレイト + 実装**: ユースケース層はトレイト経由で利用し、DynamoDB 実装とテスト用モックを差し替える
//! - **ドキュメントストア**: 1 エンティティ = 1 アイテム。参照（ブログの作成者、ユーザーのブログ一覧）は ID で保持する
//! - **結合はユースケース層**: リポジトリは他テーブルを参照しない

pub mod blog_repository;
pub mod user_repository;

pub use blog_repository::{BlogRepository, DynamoDbBlogRepository};
pub use user_repository::{DynamoDbUserRepository, UserRepository};
