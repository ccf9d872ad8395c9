//! # ユーザー
//!
//! ユーザーエンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: UserId は UUID をラップし、型安全性を確保
//! - **不変性**: フィールドはメソッド経由でのみ変更し、変更後の値を返す
//! - **認証情報の分離**: パスワードハッシュは保持するが、シリアライズ対象にしない
//!   （API レスポンスは api 層の DTO で組み立てる）
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bloglist_domain::{
//!     blog::BlogId,
//!     password::PasswordHash,
//!     user::{User, UserId, Username},
//! };
//!
//! let user = User::new(
//!     UserId::new(),
//!     Username::new("mluukkai")?,
//!     Some("Matti Luukkainen".to_string()),
//!     PasswordHash::new("$argon2id$..."),
//! );
//! let blog_id = BlogId::new();
//! let user = user.with_blog(blog_id);
//! assert_eq!(user.blogs(), &[blog_id]);
//! # Ok(())
//! # }
//! ```

use crate::{blog::BlogId, password::PasswordHash};

define_uuid_id! {
    /// ユーザー ID
    pub struct UserId;
}

define_validated_string! {
    /// ユーザー名（ログイン ID）
    ///
    /// ユーザー間で一意。一意性は永続化層が保証する。
    pub struct Username {
        model: "User",
        path: "username",
        min_length: 3,
        max_length: 64,
    }
}

/// ユーザーエンティティ
///
/// # 不変条件
///
/// - `username` はユーザー間で一意
/// - `blogs` は重複なし、ID 昇順（= 作成順）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:            UserId,
    username:      Username,
    name:          Option<String>,
    password_hash: PasswordHash,
    blogs:         Vec<BlogId>,
}

impl User {
    /// 新規ユーザーを作成する（ブログはまだない）
    pub fn new(
        id: UserId,
        username: Username,
        name: Option<String>,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            username,
            name,
            password_hash,
            blogs: Vec::new(),
        }
    }

    /// 永続化層から復元する
    ///
    /// ストア側の並び順に依存しないよう、ブログ ID を正規化する。
    pub fn from_db(
        id: UserId,
        username: Username,
        name: Option<String>,
        password_hash: PasswordHash,
        mut blogs: Vec<BlogId>,
    ) -> Self {
        blogs.sort();
        blogs.dedup();
        Self {
            id,
            username,
            name,
            password_hash,
            blogs,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn blogs(&self) -> &[BlogId] {
        &self.blogs
    }

    /// 作成したブログを追加した新しいインスタンスを返す
    pub fn with_blog(mut self, blog_id: BlogId) -> Self {
        if let Err(pos) = self.blogs.binary_search(&blog_id) {
            self.blogs.insert(pos, blog_id);
        }
        self
    }

    /// ブログを取り除いた新しいインスタンスを返す
    pub fn without_blog(mut self, blog_id: &BlogId) -> Self {
        self.blogs.retain(|id| id != blog_id);
        self
    }
}
