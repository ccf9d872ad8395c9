//! # API サーバー設定
//!
//! 環境変数から API サーバーの設定を読み込む。

use std::{env, path::PathBuf};

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   /// 必須の環境変数が未設定
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   /// 値の形式が不正
   #[error("{name} の値が不正です: {value}")]
   Invalid { name: &'static str, value: String },
}

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
   /// バインドアドレス
   pub host:                  String,
   /// ポート番号
   pub port:                  u16,
   /// トークン署名用シークレット
   pub secret:                String,
   /// トークンの有効期間（秒）
   pub token_ttl_secs:        i64,
   /// DynamoDB エンドポイント（未指定なら AWS の標準解決）
   pub dynamodb_endpoint:     Option<String>,
   /// AWS リージョン
   pub aws_region:            String,
   /// DynamoDB テーブル名のプレフィックス
   pub table_prefix:          String,
   /// 静的ファイルのディレクトリ
   pub static_dir:            PathBuf,
   /// テスト用リセットエンドポイントを公開するか
   pub enable_testing_routes: bool,
}

impl ApiConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の参照関数から設定を読み込む
   ///
   /// 空文字列は未設定として扱う。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

      let secret = get("SECRET").ok_or(ConfigError::Missing("SECRET"))?;

      Ok(Self {
         host: get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
         port: parse_or("PORT", get("PORT"), 3003)?,
         secret,
         token_ttl_secs: parse_positive("TOKEN_TTL_SECS", get("TOKEN_TTL_SECS"), 3600)?,
         dynamodb_endpoint: get("DYNAMODB_ENDPOINT"),
         aws_region: get("AWS_REGION").unwrap_or_else(|| "ap-northeast-1".to_string()),
         table_prefix: get("DYNAMODB_TABLE_PREFIX").unwrap_or_else(|| "bloglist".to_string()),
         static_dir: get("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("dist")),
         enable_testing_routes: parse_bool("ENABLE_TESTING_ROUTES", get("ENABLE_TESTING_ROUTES"))?,
      })
   }

   /// トークンの有効期間
   pub fn token_ttl(&self) -> chrono::Duration {
      chrono::Duration::seconds(self.token_ttl_secs)
   }
}

fn parse_or<T: std::str::FromStr>(
   name: &'static str,
   value: Option<String>,
   default: T,
) -> Result<T, ConfigError> {
   match value {
      Some(value) => value
         .trim()
         .parse()
         .map_err(|_| ConfigError::Invalid { name, value }),
      None => Ok(default),
   }
}

fn parse_positive(
   name: &'static str,
   value: Option<String>,
   default: i64,
) -> Result<i64, ConfigError> {
   let parsed = parse_or(name, value, default)?;
   if parsed <= 0 {
      return Err(ConfigError::Invalid {
         name,
         value: parsed.to_string(),
      });
   }
   Ok(parsed)
}

fn parse_bool(name: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
   match value.as_deref().map(|v| v.trim().to_ascii_lowercase()).as_deref() {
      None | Some("false" | "0") => Ok(false),
      Some("true" | "1") => Ok(true),
      Some(_) => Err(ConfigError::Invalid {
         name,
         value: value.unwrap_or_default(),
      }),
   }
}
