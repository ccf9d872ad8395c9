//! API 統合テスト共通ヘルパー
//!
//! インメモリリポジトリと本物の JWT トークンサービスで Router を組み立て、
//! `oneshot` でリクエストを送る。

#![allow(dead_code)]

use std::{collections::HashMap, path::Path, sync::Arc};

use axum::{
   Router,
   body::Body,
   http::{Method, Request, StatusCode, header},
   response::Response,
};
use bloglist_api::{
   app_builder::{AppDependencies, build_app},
   config::ApiConfig,
};
use bloglist_domain::{
   blog::{Blog, BlogId, BlogTitle, BlogUrl, Likes},
   clock::{Clock, SystemClock},
   password::PasswordHash,
   user::{User, UserId, Username},
};
use bloglist_infra::{
   JwtTokenService,
   TokenService,
   mock::{MockBlogRepository, MockPasswordHasher, MockUserRepository},
   repository::{BlogRepository, UserRepository},
};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// テスト用アプリケーションと、その裏側のインメモリストア
pub struct TestApp {
   pub router: Router,
   pub users:  MockUserRepository,
   pub blogs:  MockBlogRepository,
}

pub fn test_config(enable_testing_routes: bool) -> ApiConfig {
   let mut env = vec![("STATIC_DIR", "/nonexistent-bloglist-static".to_string())];
   if enable_testing_routes {
      env.push(("ENABLE_TESTING_ROUTES", "true".to_string()));
   }
   config_from(env)
}

/// 静的ファイルを `dir` から配信する設定
pub fn test_config_with_static_dir(dir: &Path) -> ApiConfig {
   config_from(vec![("STATIC_DIR", dir.display().to_string())])
}

fn config_from(vars: Vec<(&'static str, String)>) -> ApiConfig {
   let mut env: HashMap<&str, String> = HashMap::from([("SECRET", TEST_SECRET.to_string())]);
   env.extend(vars);
   ApiConfig::from_lookup(|name| env.get(name).cloned()).unwrap()
}

pub fn token_service(clock: Arc<dyn Clock>) -> JwtTokenService {
   JwtTokenService::new(TEST_SECRET, chrono::Duration::hours(1), clock)
}

pub fn spawn_app() -> TestApp {
   spawn_app_with(test_config(false))
}

pub fn spawn_app_with(config: ApiConfig) -> TestApp {
   let users = MockUserRepository::new();
   let blogs = MockBlogRepository::new();
   let deps = AppDependencies {
      user_repository:   Arc::new(users.clone()),
      blog_repository:   Arc::new(blogs.clone()),
      password_hasher:   Arc::new(MockPasswordHasher),
      token_service:     Arc::new(token_service(Arc::new(SystemClock))),
      dependency_checks: Vec::new(),
   };
   TestApp {
      router: build_app(&config, deps),
      users,
      blogs,
   }
}

impl TestApp {
   /// パスワード `sekret` のユーザーを直接ストアに登録する
   pub async fn seed_user(&self, username: &str) -> User {
      let user = User::new(
         UserId::new(),
         Username::new(username).unwrap(),
         Some(format!("{username} name")),
         PasswordHash::new("mock$sekret"),
      );
      self.users.insert(&user).await.unwrap();
      user
   }

   /// 作成者付きのブログを直接ストアに登録する
   pub async fn seed_blog(&self, title: &str, owner: Option<&User>) -> Blog {
      let blog = Blog::new(
         BlogId::new(),
         BlogTitle::new(title).unwrap(),
         Some("Robert C. Martin".to_string()),
         BlogUrl::new(format!("http://blog.example.com/{}", title.replace(' ', "-"))).unwrap(),
         Likes::new(3).unwrap(),
         owner.map(|u| *u.id()),
      );
      self.blogs.insert(&blog).await.unwrap();
      if let Some(owner) = owner {
         self.users.add_blog(owner.id(), blog.id()).await.unwrap();
      }
      blog
   }

   /// ユーザーのアクセストークンを発行する
   pub fn token_for(&self, user: &User) -> String {
      token_service(Arc::new(SystemClock))
         .issue(user.id(), user.username())
         .unwrap()
   }

   /// リクエストをそのまま送り、レスポンスを返す
   pub async fn request(&self, request: Request<Body>) -> Response {
      self.router.clone().oneshot(request).await.unwrap()
   }

   /// リクエストを送り、ステータスと JSON ボディ（空なら Null）を返す
   pub async fn send(
      &self,
      method: Method,
      uri: &str,
      token: Option<&str>,
      body: Option<Value>,
   ) -> (StatusCode, Value) {
      let mut builder = Request::builder().method(method).uri(uri);
      if let Some(token) = token {
         builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
      }
      let request = match body {
         Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
         None => builder.body(Body::empty()).unwrap(),
      };

      let response = self.request(request).await;
      let status = response.status();
      let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      let json = if bytes.is_empty() {
         Value::Null
      } else {
         serde_json::from_slice(&bytes).unwrap()
      };
      (status, json)
   }
}
