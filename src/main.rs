use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use edge_guard::{
    GuardState,
    clock::SystemClock,
    config::Config,
    routes,
    store::{KvStore, RedisStore, SharedStore},
};
#[cfg(debug_assertions)]
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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

    // 设置共享存储，未配置 Redis 时关闭安全防护
    let store: SharedStore = match &config.redis_url {
        Some(url) => {
            let redis = RedisStore::open(url, config.store_timeout())
                .expect("Failed to create Redis client");
            tracing::info!(
                timeout_ms = config.store_timeout_ms,
                "Security store configured"
            );
            Some(Arc::new(redis) as Arc<dyn KvStore>)
        }
        None => {
            tracing::warn!("REDIS_URL not set, rate limiting, lockout and caching are disabled");
            None
        }
    };

    let state = GuardState::new(config.clone(), store, Arc::new(SystemClock));
    let router = routes::router(state);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
