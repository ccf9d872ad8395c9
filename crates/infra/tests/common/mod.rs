//! テスト共通フィクスチャ
//!
//! DynamoDB Local を使用する統合テストで共通利用するクライアント生成と
//! エンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use aws_sdk_dynamodb::Client;
use bloglist_domain::{
    blog::{Blog, BlogId, BlogTitle, BlogUrl, Likes},
    password::PasswordHash,
    user::{User, UserId, Username},
};
use bloglist_infra::dynamodb::{self, TableNames};

/// テスト用の DynamoDB エンドポイント
///
/// `DYNAMODB_ENDPOINT` が未設定なら `http://localhost:8000`（DynamoDB Local の既定ポート）。
pub fn dynamodb_endpoint() -> String {
    let _ = dotenvy::dotenv();
    std::env::var("DYNAMODB_ENDPOINT").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// テストごとに独立したテーブルを用意する
///
/// ランダムなプレフィックスで他テストとの競合を防ぐ。
pub async fn setup() -> (Client, TableNames) {
    let client = dynamodb::create_client(Some(&dynamodb_endpoint()), "ap-northeast-1").await;
    let tables = TableNames::with_prefix(&format!("test_{}", uuid::Uuid::now_v7().simple()));
    dynamodb::ensure_tables(&client, &tables).await.unwrap();
    (client, tables)
}

/// テスト用テーブルを削除する
pub async fn teardown(client: &Client, tables: &TableNames) {
    for table in [&tables.users, &tables.usernames, &tables.blogs] {
        let _ = client.delete_table().table_name(table).send().await;
    }
}

pub fn test_user(username: &str) -> User {
    User::new(
        UserId::new(),
        Username::new(username).unwrap(),
        Some("Test User".to_string()),
        PasswordHash::new("$argon2id$v=19$m=65536,t=1,p=1$dummy$dummy"),
    )
}

pub fn test_blog(title: &str, user_id: Option<UserId>) -> Blog {
    Blog::new(
        BlogId::new(),
        BlogTitle::new(title).unwrap(),
        Some("Test Author".to_string()),
        BlogUrl::new("https://example.com/").unwrap(),
        Likes::from_stored(0),
        user_id,
    )
}
