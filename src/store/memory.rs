use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::KvStore;
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;

/// 带过期时间的内存条目
#[derive(Clone)]
struct MemoryEntry {
    value: Value,
    expires_at: i64,
}

/// 内存存储，用于单实例开发环境和测试
///
/// 过期按注入的时钟判断，测试里推进 `ManualClock` 即可模拟 TTL 回收。
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, MemoryEntry>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// 清理已过期条目
    pub async fn cleanup(&self) {
        let now = self.clock.now_millis();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
    }

    /// 未过期的条目数
    pub async fn len(&self) -> usize {
        let now = self.clock.now_millis();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.read().await;
        if let Some(entry) = entries.get(key)
            && self.clock.now_millis() < entry.expires_at
        {
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: Value, ttl_secs: u64) -> Result<(), StoreError> {
        let expires_at = self
            .clock
            .now_millis()
            .saturating_add((ttl_secs as i64).saturating_mul(1000));
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), MemoryEntry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;
    use std::time::Duration;

    fn store_with_clock() -> (MemoryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        (MemoryStore::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn entries_expire_with_clock() {
        let (store, clock) = store_with_clock();
        store.put("rate:1.1.1.1", json!({"count": 1}), 60).await.unwrap();

        clock.advance(Duration::from_secs(59));
        assert!(store.get("rate:1.1.1.1").await.unwrap().is_some());

        clock.advance(Duration::from_secs(1));
        assert!(store.get("rate:1.1.1.1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let (store, _clock) = store_with_clock();
        store.put("lockout:alice", json!({"failedAttempts": 2}), 60).await.unwrap();
        store.delete("lockout:alice").await.unwrap();
        assert!(store.get("lockout:alice").await.unwrap().is_none());

        // 删除不存在的键不是错误
        store.delete("lockout:nobody").await.unwrap();
    }

    #[tokio::test]
    async fn cleanup_drops_expired_entries() {
        let (store, clock) = store_with_clock();
        store.put("a", json!(1), 10).await.unwrap();
        store.put("b", json!(2), 100).await.unwrap();
        assert_eq!(store.len().await, 2);

        clock.advance(Duration::from_secs(50));
        store.cleanup().await;
        assert_eq!(store.entries.read().await.len(), 1);
        assert_eq!(store.len().await, 1);
    }
}
