//! # Bloglist API サーバー
//!
//! ブログ投稿・ユーザー登録・ログインを提供する REST API サーバー。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | No | ポート番号（デフォルト: `3003`） |
//! | `SECRET` | **Yes** | アクセストークンの署名鍵 |
//! | `TOKEN_TTL_SECS` | No | トークン有効期間（秒、デフォルト: `3600`） |
//! | `DYNAMODB_ENDPOINT` | No | DynamoDB エンドポイント（DynamoDB Local 用） |
//! | `AWS_REGION` | No | リージョン（デフォルト: `ap-northeast-1`） |
//! | `DYNAMODB_TABLE_PREFIX` | No | テーブル名プレフィックス（デフォルト: `bloglist`） |
//! | `STATIC_DIR` | No | 静的ファイルディレクトリ（デフォルト: `dist`） |
//! | `ENABLE_TESTING_ROUTES` | No | `/api/testing/reset` を有効化 |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（DynamoDB Local）
//! SECRET=dev DYNAMODB_ENDPOINT=http://localhost:8000 cargo run -p bloglist-api
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use bloglist_api::{
    app_builder::{AppDependencies, build_app},
    config::ApiConfig,
    handler::DynamoDbCheck,
};
use bloglist_domain::clock::SystemClock;
use bloglist_infra::{
    Argon2PasswordHasher,
    JwtTokenService,
    dynamodb::{self, TableNames},
    repository::{DynamoDbBlogRepository, DynamoDbUserRepository},
};
use bloglist_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Bloglist API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("bloglist-api");
    init_tracing(&tracing_config);
    let _tracing_guard =
        tracing::info_span!("app", service = %tracing_config.service_name).entered();

    // 設定読み込み
    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Bloglist API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // DynamoDB クライアントを作成し、テーブルを準備
    let client =
        dynamodb::create_client(config.dynamodb_endpoint.as_deref(), &config.aws_region).await;
    let tables = TableNames::with_prefix(&config.table_prefix);
    dynamodb::ensure_tables(&client, &tables)
        .await
        .context("DynamoDB テーブルの準備に失敗しました")?;
    tracing::info!("DynamoDB テーブルを準備しました");

    let deps = AppDependencies {
        user_repository:   Arc::new(DynamoDbUserRepository::new(client.clone(), &tables)),
        blog_repository:   Arc::new(DynamoDbBlogRepository::new(client.clone(), &tables)),
        password_hasher:   Arc::new(Argon2PasswordHasher::new()),
        token_service:     Arc::new(JwtTokenService::new(
            &config.secret,
            config.token_ttl(),
            Arc::new(SystemClock),
        )),
        dependency_checks: vec![Arc::new(DynamoDbCheck::new(client))],
    };

    let app = build_app(&config, deps);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Bloglist API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
