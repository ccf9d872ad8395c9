//! # Bloglist ドメイン層
//!
//! ブログ投稿とユーザーアカウントのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（[`user::User`], [`blog::Blog`]）
//! - **値オブジェクト**: 生成時にバリデーションを済ませた不変オブジェクト
//!   （[`user::Username`], [`blog::BlogTitle`] など）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、トークン署名、ハッシュ）には一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bloglist_domain::blog::{Blog, BlogId, BlogTitle, BlogUrl, Likes};
//!
//! let blog = Blog::new(
//!     BlogId::new(),
//!     BlogTitle::new("React patterns")?,
//!     Some("Michael Chan".to_string()),
//!     BlogUrl::new("https://reactpatterns.com/")?,
//!     Likes::default(),
//!     None,
//! );
//! assert_eq!(blog.likes().value(), 0);
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod blog;
pub mod clock;
pub mod error;
pub mod password;
pub mod user;

pub use error::DomainError;
