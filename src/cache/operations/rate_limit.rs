use std::sync::Arc;

use tracing::{error, info};

use crate::cache::keys::rate_limit_key;
use crate::cache::models::RateWindow;
use crate::clock::Clock;
use crate::error::{ConfigError, StoreError};
use crate::store::{KvStore, SharedStore, load_record, save_record};

/// 限流配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// 窗口内允许的最大请求数，0 表示全部拒绝
    pub max_requests: u32,
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_secs == 0 {
            return Err(ConfigError::invalid(
                "RATE_LIMIT_WINDOW",
                "window must be at least one second",
            ));
        }
        Ok(())
    }
}

/// 按客户端 IP 计数的固定窗口限流器
///
/// 存储故障时放行，只记录错误日志。
#[derive(Clone)]
pub struct RateLimiter {
    store: SharedStore,
    clock: Arc<dyn Clock>,
}

/// 本次请求的判定结果
enum Decision {
    Allowed(RateWindow),
    Denied(RateWindow),
}

impl RateLimiter {
    pub fn new(store: SharedStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// 检查并消耗一次请求配额，返回是否放行
    pub async fn check_and_consume(
        &self,
        client_identity: &str,
        config: &RateLimitConfig,
        debug: bool,
    ) -> bool {
        let Some(store) = self.store.as_deref() else {
            return true;
        };

        let key = rate_limit_key(client_identity);
        match self.consume(store, &key, config).await {
            Ok(Decision::Allowed(window)) => {
                if debug {
                    info!(
                        key = %key,
                        count = window.count,
                        max_requests = config.max_requests,
                        window_start = window.window_start,
                        "Rate limit allowed"
                    );
                }
                true
            }
            Ok(Decision::Denied(window)) => {
                if debug {
                    info!(
                        key = %key,
                        count = window.count,
                        max_requests = config.max_requests,
                        window_start = window.window_start,
                        "Rate limit denied"
                    );
                }
                false
            }
            Err(e) => {
                error!(key = %key, error = %e, "Rate limit store failure, allowing request");
                true
            }
        }
    }

    async fn consume(
        &self,
        store: &dyn KvStore,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<Decision, StoreError> {
        let now = self.clock.now_millis();

        let current = load_record::<RateWindow>(store, key).await?;

        // 上限为 0 时全部拒绝，但读失败仍按放行处理
        if config.max_requests == 0 {
            return Ok(Decision::Denied(current.unwrap_or(RateWindow {
                count: 0,
                window_start: now,
            })));
        }

        let next = match current {
            Some(window) if !window.is_expired(now, config.window_secs) => {
                if window.count >= config.max_requests {
                    // 拒绝时不写入，避免延长窗口
                    return Ok(Decision::Denied(window));
                }
                RateWindow {
                    count: window.count + 1,
                    window_start: window.window_start,
                }
            }
            _ => RateWindow::start(now),
        };

        save_record(store, key, &next, config.window_secs).await?;
        Ok(Decision::Allowed(next))
    }
}
