use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch},
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webhook_proxy::{
    AppState,
    config::Config,
    database,
    egress::EgressPool,
    forward::Forwarder,
    middleware::{RateLimiter, log_failures, rate_limit},
    routes,
};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'webhook_proxy';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    // 初始化表结构
    database::ensure_schema(&pool)
        .await
        .expect("Failed to prepare database schema");

    // 设置 Redis 客户端
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let redis_arc = Arc::new(redis_client.clone());

    // 发现本机出口地址，一个可用地址都没有时直接退出
    let egress = Arc::new(
        EgressPool::discover(config.upstream_timeout()).expect("No usable egress address found"),
    );
    tracing::info!(
        "Egress pool ready with {} local address(es): {:?}",
        egress.len(),
        egress.addrs()
    );

    let forwarder = Arc::new(Forwarder::new(&config.upstream_url));

    // 设置应用状态
    let state = AppState {
        pool,
        config: config.clone(),
        redis: redis_arc,
        egress,
        forwarder,
    };

    // 设置限流器
    let rate_limiter = Arc::new(RateLimiter::new(redis_client, config.clone()));

    // webhook 转发路由全部经过限流
    let webhook_routes = Router::new()
        .route(
            "/api/webhooks/{webhook_id}/{webhook_token}",
            get(routes::webhook::get_webhook).post(routes::webhook::execute_webhook),
        )
        .route(
            "/api/webhooks/{webhook_id}/{webhook_token}/messages/{message_id}",
            patch(routes::webhook::edit_message).delete(routes::webhook::delete_message),
        )
        .layer(axum::middleware::from_fn_with_state(rate_limiter, rate_limit));

    // 统计页不参与限流
    let router = Router::new()
        .route("/", get(routes::stats::stats_page))
        .merge(webhook_routes)
        .layer(axum::middleware::from_fn(log_failures));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        // 设置开发环境的CORS，允许所有来源
        let cors = CorsLayer::permissive();
        router.layer(cors)
    };

    // 添加应用状态
    let app = router.with_state(state.clone());

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!(
        "Webhook proxy listening on {}, forwarding to {}",
        addr,
        state.config.upstream_url
    );
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}
