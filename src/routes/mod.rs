use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{
    GuardState,
    middleware::{IpRateLimit, rate_limit},
};

pub mod health;

/// 组装路由并挂上 IP 限流中间件，业务路由挂在这里
pub fn router(state: GuardState) -> Router {
    let limiter = Arc::new(IpRateLimit::new(
        state.rate_limiter.clone(),
        state.config.rate_limit(),
        state.config.trust_proxy_headers,
        state.debug(),
    ));

    Router::new()
        .route("/health", get(health::health))
        .layer(axum::middleware::from_fn_with_state(limiter, rate_limit))
        .with_state(state)
}
