//! # アプリケーション構築
//!
//! DI（ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use bloglist_infra::{
    PasswordHasher,
    TokenService,
    repository::{BlogRepository, UserRepository},
};
use bloglist_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    config::ApiConfig,
    handler::{
        BlogState,
        DependencyCheck,
        LoginState,
        ReadinessState,
        TestingState,
        UserState,
        create_blog,
        create_user,
        delete_blog,
        get_blog,
        health_check,
        list_blogs,
        list_users,
        login,
        readiness_check,
        reset,
        unknown_endpoint,
        update_blog,
    },
    middleware::{AuthState, require_auth},
    usecase::{BlogUseCaseImpl, LoginUseCaseImpl, TestingUseCaseImpl, UserUseCaseImpl},
};

/// インフラ初期化済みの依存
pub struct AppDependencies {
    pub user_repository:   Arc<dyn UserRepository>,
    pub blog_repository:   Arc<dyn BlogRepository>,
    pub password_hasher:   Arc<dyn PasswordHasher>,
    pub token_service:     Arc<dyn TokenService>,
    pub dependency_checks: Vec<Arc<dyn DependencyCheck>>,
}

/// DI コンテナの構築とルーター定義を行う
///
/// 依存を受け取り、ユースケース → State → Router の順に組み立てる。
pub fn build_app(config: &ApiConfig, deps: AppDependencies) -> Router {
    let blog_state = Arc::new(BlogState {
        usecase: Arc::new(BlogUseCaseImpl::new(
            deps.blog_repository.clone(),
            deps.user_repository.clone(),
        )),
    });
    let user_state = Arc::new(UserState {
        usecase: Arc::new(UserUseCaseImpl::new(
            deps.user_repository.clone(),
            deps.blog_repository.clone(),
            deps.password_hasher.clone(),
        )),
    });
    let login_state = Arc::new(LoginState {
        usecase: Arc::new(LoginUseCaseImpl::new(
            deps.user_repository.clone(),
            deps.password_hasher,
            deps.token_service.clone(),
        )),
    });
    let readiness_state = Arc::new(ReadinessState {
        checks: deps.dependency_checks,
    });
    let auth_state = AuthState {
        token_service: deps.token_service,
    };

    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        // ブログ API（参照・更新は認証不要）
        .merge(
            Router::new()
                .route("/api/blogs", get(list_blogs))
                .route("/api/blogs/{id}", get(get_blog).put(update_blog))
                .with_state(blog_state.clone()),
        )
        // ブログ API（作成・削除は認証必須）
        .merge(
            Router::new()
                .route("/api/blogs", post(create_blog))
                .route("/api/blogs/{id}", delete(delete_blog))
                .route_layer(from_fn_with_state(auth_state, require_auth))
                .with_state(blog_state),
        )
        .merge(
            Router::new()
                .route("/api/users", get(list_users).post(create_user))
                .with_state(user_state),
        )
        .merge(
            Router::new()
                .route("/api/login", post(login))
                .with_state(login_state),
        );

    if config.enable_testing_routes {
        tracing::warn!("テスト用エンドポイント /api/testing/reset が有効です");
        let testing_state = Arc::new(TestingState {
            usecase: Arc::new(TestingUseCaseImpl::new(
                deps.blog_repository,
                deps.user_repository,
            )),
        });
        router = router.merge(
            Router::new()
                .route("/api/testing/reset", post(reset))
                .with_state(testing_state),
        );
    }

    // 既知のパスでも未対応のメソッドは unknown endpoint（merge 後に全ルートへ適用する）
    router = router.method_not_allowed_fallback(unknown_endpoint);

    // ルートに一致しないリクエストは静的ファイル、それもなければ unknown endpoint
    let static_files = ServeDir::new(&config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(unknown_endpoint.into_service());

    // Request ID レイヤー（レイヤー順序が重要: 下に書いたものが外側）
    // 1. CorsLayer（最外）: プリフライトに応答
    // 2. SetRequestIdLayer: リクエスト受信時に UUID v7 を生成（またはクライアント提供値を使用）
    // 3. TraceLayer: カスタムスパンに request_id を含め、全ログに自動注入
    // 4. CanonicalLogLineLayer: リクエスト完了時に1行サマリログを出力（スパン内）
    // 5. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
    router
        .fallback_service(static_files)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(CorsLayer::permissive())
}
