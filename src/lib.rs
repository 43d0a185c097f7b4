use std::sync::Arc;

use cache::{LockoutGuard, RateLimiter, ResponseCache};
use clock::Clock;
use config::Config;
use store::SharedStore;

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod store;
pub mod utils;

/// 请求处理器共享的防护层
///
/// 处理器按 "校验 -> 锁定检查 -> 业务调用 -> 记录结果 -> 缓存" 的顺序调用各组件，
/// 组件之间互不调用。
#[derive(Clone)]
pub struct GuardState {
    pub config: Config,
    pub rate_limiter: RateLimiter,
    pub lockout: LockoutGuard,
    pub balance_cache: ResponseCache,
}

impl GuardState {
    pub fn new(config: Config, store: SharedStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            rate_limiter: RateLimiter::new(store.clone(), clock.clone()),
            lockout: LockoutGuard::new(store.clone(), clock.clone()),
            balance_cache: ResponseCache::new(store, clock, config.balance_cache()),
            config,
        }
    }

    pub fn debug(&self) -> bool {
        self.config.security_debug
    }
}
