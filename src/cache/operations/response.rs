use std::sync::Arc;

use tracing::{error, info};

use crate::cache::keys::response_key;
use crate::cache::models::CacheEntry;
use crate::clock::Clock;
use crate::error::ConfigError;
use crate::store::{SharedStore, load_record, save_record};
use crate::utils::mask_secret;

/// 响应缓存配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub prefix: String,
    pub freshness_secs: u64,
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::invalid(
                "BALANCE_CACHE_PREFIX",
                "prefix must not be empty",
            ));
        }
        if self.freshness_secs == 0 {
            return Err(ConfigError::invalid(
                "BALANCE_CACHE_TTL",
                "freshness must be at least one second",
            ));
        }
        Ok(())
    }

    /// 物理保留时间为新鲜期的两倍
    fn retention_secs(&self) -> u64 {
        self.freshness_secs.saturating_mul(2)
    }
}

/// 短 TTL 响应缓存（如账户余额）
///
/// 只是优化手段：读失败视为未命中，写失败记录日志后忽略。
#[derive(Clone)]
pub struct ResponseCache {
    store: SharedStore,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(store: SharedStore, clock: Arc<dyn Clock>, config: CacheConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// 读取新鲜的缓存值，过期但仍在存储中的条目不会返回
    pub async fn get(&self, identity: &str, debug: bool) -> Option<String> {
        let store = self.store.as_deref()?;

        let key = response_key(&self.config.prefix, identity);
        let entry = match load_record::<CacheEntry>(store, &key).await {
            Ok(entry) => entry,
            Err(e) => {
                error!(
                    account = %mask_secret(identity),
                    error = %e,
                    "Cache read failed, treating as miss"
                );
                return None;
            }
        };

        let now = self.clock.now_millis();
        let hit = entry.filter(|e| e.is_fresh(now, self.config.freshness_secs));

        if debug {
            info!(
                account = %mask_secret(identity),
                prefix = %self.config.prefix,
                hit = hit.is_some(),
                age_ms = hit.as_ref().map(|e| now.saturating_sub(e.cached_at)),
                "Cache lookup"
            );
        }
        hit.map(|e| e.value)
    }

    /// 覆盖写入缓存值
    pub async fn set(&self, identity: &str, value: &str, debug: bool) {
        let Some(store) = self.store.as_deref() else {
            return;
        };

        let key = response_key(&self.config.prefix, identity);
        let entry = CacheEntry {
            value: value.to_string(),
            cached_at: self.clock.now_millis(),
        };

        match save_record(store, &key, &entry, self.config.retention_secs()).await {
            Ok(()) => {
                if debug {
                    info!(
                        account = %mask_secret(identity),
                        prefix = %self.config.prefix,
                        value = %mask_secret(value),
                        retention_secs = self.config.retention_secs(),
                        "Cache stored"
                    );
                }
            }
            Err(e) => {
                error!(
                    account = %mask_secret(identity),
                    error = %e,
                    "Cache write failed, ignoring"
                );
            }
        }
    }
}
