//! # DynamoDB 接続管理
//!
//! ブログとユーザーを保存するドキュメントストア（Amazon DynamoDB）への
//! 接続管理とテーブル準備を行う。
//!
//! ## 設計方針
//!
//! - **ローカル開発 / テスト**: DynamoDB Local を使用（`DYNAMODB_ENDPOINT` を指定）
//! - **本番環境**: 標準の認証情報プロバイダチェーンで Amazon DynamoDB に接続
//! - **テーブル自動作成**: 起動時にテーブルが存在しなければ作成（冪等）
//!
//! ## テーブル構成
//!
//! | テーブル | パーティションキー | 用途 |
//! |---------|------------------|------|
//! | `{prefix}_users` | `id` | ユーザー |
//! | `{prefix}_usernames` | `username` | ユーザー名の一意性保証 |
//! | `{prefix}_blogs` | `id` | ブログ |
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use bloglist_infra::dynamodb::{self, TableNames};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = dynamodb::create_client(Some("http://localhost:8000"), "ap-northeast-1").await;
//!     dynamodb::ensure_tables(&client, &TableNames::with_prefix("bloglist")).await?;
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;

use aws_sdk_dynamodb::{
    Client,
    types::{
        AttributeDefinition,
        AttributeValue,
        BillingMode,
        DeleteRequest,
        KeySchemaElement,
        KeyType,
        ScalarAttributeType,
        WriteRequest,
    },
};

use crate::InfraError;

/// `BatchWriteItem` 1 回あたりの最大リクエスト数
const BATCH_WRITE_LIMIT: usize = 25;

/// DynamoDB のアイテム表現
pub type Item = HashMap<String, AttributeValue>;

/// アプリケーションが使うテーブル名の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub users:     String,
    pub usernames: String,
    pub blogs:     String,
}

impl TableNames {
    /// プレフィックスからテーブル名を組み立てる
    ///
    /// テスト用に別プレフィックスを使えば、同じ DynamoDB 上でデータを分離できる。
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            users:     format!("{prefix}_users"),
            usernames: format!("{prefix}_usernames"),
            blogs:     format!("{prefix}_blogs"),
        }
    }
}

/// DynamoDB クライアントを作成する
///
/// `endpoint` を指定した場合は DynamoDB Local 向けにダミーの認証情報を使う
/// （DynamoDB Local は認証情報を検証しないが、SDK はプロバイダを要求する）。
/// 未指定の場合は標準の認証情報プロバイダチェーンを使う。
pub async fn create_client(endpoint: Option<&str>, region: &str) -> Client {
    let loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    let config = match endpoint {
        Some(endpoint) => {
            loader
                .endpoint_url(endpoint)
                .credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
                    "local", "local", None, None, "local",
                ))
                .load()
                .await
        }
        None => loader.load().await,
    };

    Client::new(&config)
}

/// 接続確認（Readiness Check 用）
pub async fn check_connection(client: &Client) -> Result<(), InfraError> {
    client
        .list_tables()
        .limit(1)
        .send()
        .await
        .map_err(|e| InfraError::dynamo_db(format!("接続確認に失敗: {e}")))?;
    Ok(())
}

/// アプリケーションが使う全テーブルを用意する（冪等）
pub async fn ensure_tables(client: &Client, tables: &TableNames) -> Result<(), InfraError> {
    ensure_table(client, &tables.users, "id").await?;
    ensure_table(client, &tables.usernames, "username").await?;
    ensure_table(client, &tables.blogs, "id").await?;
    Ok(())
}

/// 文字列パーティションキーのみを持つテーブルが存在しなければ作成する（冪等）
pub async fn ensure_table(
    client: &Client,
    table_name: &str,
    partition_key: &str,
) -> Result<(), InfraError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            tracing::debug!("テーブル '{}' は既に存在します", table_name);
            return Ok(());
        }
        Err(err) => {
            // ResourceNotFoundException の場合のみテーブル作成に進む
            let not_found = err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception());
            if !not_found {
                return Err(InfraError::dynamo_db(format!(
                    "テーブル '{table_name}' の確認に失敗: {err}"
                )));
            }
        }
    }

    tracing::info!("テーブル '{}' を作成します", table_name);

    let result = client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(partition_key)
                .key_type(KeyType::Hash)
                .build()
                .map_err(|e| InfraError::dynamo_db(format!("KeySchema 構築エラー: {e}")))?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(partition_key)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| {
                    InfraError::dynamo_db(format!("AttributeDefinition 構築エラー: {e}"))
                })?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    if let Err(err) = result {
        // 並行起動時は別プロセスが作成中のことがある
        let in_use = err
            .as_service_error()
            .is_some_and(|e| e.is_resource_in_use_exception());
        if !in_use {
            return Err(InfraError::dynamo_db(format!(
                "テーブル '{table_name}' の作成に失敗: {err}"
            )));
        }
        tracing::debug!("テーブル '{}' は既に作成中です", table_name);
        return Ok(());
    }

    tracing::info!("テーブル '{}' を作成しました", table_name);
    Ok(())
}

/// テーブル全体をスキャンする（`LastEvaluatedKey` が尽きるまでページを辿る）
pub(crate) async fn scan_all(client: &Client, table_name: &str) -> Result<Vec<Item>, InfraError> {
    let mut items = Vec::new();
    let mut start_key: Option<Item> = None;

    loop {
        let output = client
            .scan()
            .table_name(table_name)
            .set_exclusive_start_key(start_key.take())
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| InfraError::dynamo_db(format!("'{table_name}' のスキャンに失敗: {e}")))?;

        items.extend(output.items().iter().cloned());

        match output.last_evaluated_key() {
            Some(key) if !key.is_empty() => start_key = Some(key.clone()),
            _ => break,
        }
    }

    Ok(items)
}

/// テーブルの全アイテムを削除する
///
/// スキャンしたキーを `BatchWriteItem` の上限（25 件）ごとに削除する。
/// 未処理アイテムが返された場合は再送せずエラーにする。
pub(crate) async fn delete_all_items(
    client: &Client,
    table_name: &str,
    partition_key: &str,
) -> Result<usize, InfraError> {
    let items = scan_all(client, table_name).await?;
    let mut requests = Vec::with_capacity(items.len());

    for item in &items {
        let key = item.get(partition_key).cloned().ok_or_else(|| {
            InfraError::invalid_data(format!("'{table_name}' のアイテムにキー '{partition_key}' がありません"))
        })?;
        let delete = DeleteRequest::builder()
            .key(partition_key, key)
            .build()
            .map_err(|e| InfraError::dynamo_db(format!("DeleteRequest 構築エラー: {e}")))?;
        requests.push(WriteRequest::builder().delete_request(delete).build());
    }

    for chunk in requests.chunks(BATCH_WRITE_LIMIT) {
        let output = client
            .batch_write_item()
            .request_items(table_name, chunk.to_vec())
            .send()
            .await
            .map_err(|e| InfraError::dynamo_db(format!("'{table_name}' の一括削除に失敗: {e}")))?;

        let unprocessed = output
            .unprocessed_items()
            .and_then(|m| m.get(table_name))
            .map_or(0, Vec::len);
        if unprocessed > 0 {
            return Err(InfraError::dynamo_db(format!(
                "'{table_name}' の一括削除で {unprocessed} 件が未処理です"
            )));
        }
    }

    tracing::debug!(table = table_name, count = items.len(), "全アイテムを削除しました");
    Ok(items.len())
}

// ===== アイテム属性の読み出し =====

/// 文字列属性を取得する
pub(crate) fn get_s(item: &Item, key: &str) -> Result<String, InfraError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| InfraError::invalid_data(format!("属性 '{key}' が見つかりません")))
}

/// 任意の文字列属性を取得する
pub(crate) fn get_opt_s(item: &Item, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

/// 数値属性を u64 として取得する
pub(crate) fn get_u64(item: &Item, key: &str) -> Result<u64, InfraError> {
    let raw = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| InfraError::invalid_data(format!("数値属性 '{key}' が見つかりません")))?;
    raw.parse()
        .map_err(|e| InfraError::invalid_data(format!("'{key}' のパースに失敗: {e}")))
}

/// 文字列セット属性を取得する（属性なしは空）
pub(crate) fn get_ss(item: &Item, key: &str) -> Vec<String> {
    item.get(key)
        .and_then(|v| v.as_ss().ok())
        .cloned()
        .unwrap_or_default()
}

/// 文字列から ID をパースする
pub(crate) fn parse_id<T>(value: &str, key: &str) -> Result<T, InfraError>
where
    T: std::str::FromStr,
{
    value
        .parse()
        .map_err(|_| InfraError::invalid_data(format!("'{key}' の ID 形式が不正: {value}")))
}
