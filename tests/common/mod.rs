#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use edge_guard::clock::ManualClock;
use edge_guard::error::StoreError;
use edge_guard::store::{KvStore, MemoryStore};

/// 所有操作都失败的存储，模拟 Redis 宕机
#[derive(Default)]
pub struct FailingStore {
    pub calls: AtomicUsize,
}

impl FailingStore {
    fn fail(&self) -> StoreError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StoreError::Unavailable("connection refused".into())
    }
}

#[async_trait]
impl KvStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(self.fail())
    }

    async fn put(&self, _key: &str, _value: Value, _ttl_secs: u64) -> Result<(), StoreError> {
        Err(self.fail())
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(self.fail())
    }
}

/// 读正常、写失败的存储
pub struct ReadOnlyStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl KvStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(key).await
    }

    async fn put(&self, _key: &str, _value: Value, _ttl_secs: u64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only replica".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only replica".into()))
    }
}

/// 测试用的共享存储和手动时钟，时钟从 0 开始
pub fn memory_fixture() -> (Arc<MemoryStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let store = Arc::new(MemoryStore::new(clock.clone()));
    (store, clock)
}
