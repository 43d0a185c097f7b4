use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    cache::{RateLimitConfig, RateLimiter},
    utils::{error_codes, error_to_api_response},
};

/// 按客户端 IP 限流的中间件状态
#[derive(Clone)]
pub struct IpRateLimit {
    limiter: RateLimiter,
    config: RateLimitConfig,
    trust_proxy_headers: bool,
    debug: bool,
}

impl IpRateLimit {
    pub fn new(
        limiter: RateLimiter,
        config: RateLimitConfig,
        trust_proxy_headers: bool,
        debug: bool,
    ) -> Self {
        Self {
            limiter,
            config,
            trust_proxy_headers,
            debug,
        }
    }

    pub async fn check_rate_limit(self: Arc<Self>, req: Request<Body>, next: Next) -> Response {
        let ip = client_ip(&req, self.trust_proxy_headers);

        if !self
            .limiter
            .check_and_consume(&ip, &self.config, self.debug)
            .await
        {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                error_to_api_response::<()>(
                    error_codes::RATE_LIMIT,
                    format!("请求过于频繁，请在{}秒后重试", self.config.window_secs),
                ),
            )
                .into_response();
        }

        next.run(req).await
    }
}

/// 客户端 IP
///
/// 只有部署在可信反向代理之后（`trust_proxy_headers`）才读取代理头，
/// 否则客户端可以伪造请求头绕过限流，只用连接地址。
pub fn client_ip<B>(req: &Request<B>, trust_proxy_headers: bool) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    if !trust_proxy_headers {
        return remote_ip.unwrap_or_else(|| "unknown".to_string());
    }

    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .filter(|ip| !ip.trim().is_empty())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<IpRateLimit>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    limiter.check_rate_limit(req, next).await
}
