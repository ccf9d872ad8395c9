//! # テスト用モック
//!
//! ユースケース・ハンドラテストで使用するインメモリのリポジトリとパスワードハッシャー。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! bloglist-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bloglist_domain::{
   blog::{Blog, BlogId},
   password::{PasswordHash, PasswordVerifyResult, PlainPassword},
   user::{User, UserId, Username},
};

use crate::{
   error::InfraError,
   password::PasswordHasher,
   repository::{BlogRepository, UserRepository},
};

// ===== MockUserRepository =====

/// ユーザー名の一意性を DynamoDB 実装と同じく Conflict で表現するモック
#[derive(Clone, Default)]
pub struct MockUserRepository {
   users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// 現在保持しているユーザーを ID 昇順で返す
   pub fn users(&self) -> Vec<User> {
      let mut users = self.users.lock().unwrap().clone();
      users.sort_by(|a, b| a.id().cmp(b.id()));
      users
   }

   fn modify(&self, user_id: &UserId, f: impl FnOnce(User) -> User) {
      let mut users = self.users.lock().unwrap();
      if let Some(user) = users.iter_mut().find(|u| u.id() == user_id) {
         *user = f(user.clone());
      }
   }
}

#[async_trait]
impl UserRepository for MockUserRepository {
   async fn insert(&self, user: &User) -> Result<(), InfraError> {
      let mut users = self.users.lock().unwrap();
      if users.iter().any(|u| u.username() == user.username()) {
         return Err(InfraError::conflict("User", user.username().as_str()));
      }
      users.push(user.clone());
      Ok(())
   }

   async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, InfraError> {
      Ok(self
         .users
         .lock()
         .unwrap()
         .iter()
         .find(|u| u.id() == id)
         .cloned())
   }

   async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError> {
      Ok(self
         .users
         .lock()
         .unwrap()
         .iter()
         .find(|u| u.username() == username)
         .cloned())
   }

   async fn find_all(&self) -> Result<Vec<User>, InfraError> {
      Ok(self.users())
   }

   async fn add_blog(&self, user_id: &UserId, blog_id: &BlogId) -> Result<(), InfraError> {
      self.modify(user_id, |user| user.with_blog(*blog_id));
      Ok(())
   }

   async fn remove_blog(&self, user_id: &UserId, blog_id: &BlogId) -> Result<(), InfraError> {
      self.modify(user_id, |user| user.without_blog(blog_id));
      Ok(())
   }

   async fn delete_all(&self) -> Result<(), InfraError> {
      self.users.lock().unwrap().clear();
      Ok(())
   }
}

// ===== MockBlogRepository =====

#[derive(Clone, Default)]
pub struct MockBlogRepository {
   blogs: Arc<Mutex<Vec<Blog>>>,
}

impl MockBlogRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// 現在保持しているブログを ID 昇順で返す
   pub fn blogs(&self) -> Vec<Blog> {
      let mut blogs = self.blogs.lock().unwrap().clone();
      blogs.sort_by(|a, b| a.id().cmp(b.id()));
      blogs
   }
}

#[async_trait]
impl BlogRepository for MockBlogRepository {
   async fn insert(&self, blog: &Blog) -> Result<(), InfraError> {
      self.blogs.lock().unwrap().push(blog.clone());
      Ok(())
   }

   async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, InfraError> {
      Ok(self
         .blogs
         .lock()
         .unwrap()
         .iter()
         .find(|b| b.id() == id)
         .cloned())
   }

   async fn find_all(&self) -> Result<Vec<Blog>, InfraError> {
      Ok(self.blogs())
   }

   async fn update(&self, blog: &Blog) -> Result<bool, InfraError> {
      let mut blogs = self.blogs.lock().unwrap();
      match blogs.iter_mut().find(|b| b.id() == blog.id()) {
         Some(stored) => {
            *stored = blog.clone();
            Ok(true)
         }
         None => Ok(false),
      }
   }

   async fn delete(&self, id: &BlogId) -> Result<(), InfraError> {
      self.blogs.lock().unwrap().retain(|b| b.id() != id);
      Ok(())
   }

   async fn delete_all(&self) -> Result<(), InfraError> {
      self.blogs.lock().unwrap().clear();
      Ok(())
   }
}

// ===== MockPasswordHasher =====

/// Argon2 の計算を省略するパスワードハッシャー
///
/// ハッシュは `mock$<平文>` 形式。`mock$` で始まらないハッシュ（ダミーハッシュ等）とは常に不一致。
#[derive(Clone, Copy, Default)]
pub struct MockPasswordHasher;

const MOCK_HASH_PREFIX: &str = "mock$";

impl PasswordHasher for MockPasswordHasher {
   fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
      Ok(PasswordHash::new(format!(
         "{MOCK_HASH_PREFIX}{}",
         password.as_str()
      )))
   }

   fn verify(
      &self,
      password: &PlainPassword,
      hash: &PasswordHash,
   ) -> Result<PasswordVerifyResult, InfraError> {
      match hash.as_str().strip_prefix(MOCK_HASH_PREFIX) {
         Some(expected) => Ok(PasswordVerifyResult::from(expected == password.as_str())),
         None => Ok(PasswordVerifyResult::Mismatch),
      }
   }
}
