use serde::{Deserialize, Serialize};

/// 响应缓存条目
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub value: String,
    pub cached_at: i64, // 毫秒时间戳
}

impl CacheEntry {
    /// 写入时间在未来的条目不算新鲜
    pub fn is_fresh(&self, now: i64, freshness_secs: u64) -> bool {
        self.cached_at <= now
            && now.saturating_sub(self.cached_at) <= (freshness_secs as i64).saturating_mul(1000)
    }
}
