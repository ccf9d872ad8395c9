//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックは usecase 層に委譲
//!
//! ## ハンドラ一覧
//!
//! - `blog`: ブログの CRUD
//! - `user`: ユーザーの一覧・登録
//! - `login`: ログイン（トークン発行）
//! - `testing`: テスト用データリセット
//! - `health`: ヘルスチェック
//! - `fallback`: 未定義エンドポイント

pub mod blog;
pub mod fallback;
pub mod health;
pub mod login;
pub mod testing;
pub mod user;

pub use blog::{BlogState, create_blog, delete_blog, get_blog, list_blogs, update_blog};
pub use fallback::unknown_endpoint;
pub use health::{DependencyCheck, DynamoDbCheck, ReadinessState, health_check, readiness_check};
pub use login::{LoginState, login};
pub use testing::{TestingState, reset};
pub use user::{UserState, create_user, list_users};
