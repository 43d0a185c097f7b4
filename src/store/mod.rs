//! 键值存储适配层
//!
//! 三个防护组件共享同一个带 TTL 的键值存储。存储被视为不可靠的：
//! 任何操作都可能失败，组件需要自己决定失败时的策略（统一为失败放行）。
//!
//! 存储本身是可选的，未配置时组件以 `None` 持有，所有操作直接走放行分支。

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::StoreError;

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// 带 TTL 的键值存储能力
///
/// 没有原子自增或 CAS；组件只做普通的读后写，接受并发下的少计。
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 读取键，不存在时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// 写入键并设置过期秒数
    async fn put(&self, key: &str, value: Value, ttl_secs: u64) -> Result<(), StoreError>;

    /// 删除键
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// 可选的共享存储句柄
pub type SharedStore = Option<Arc<dyn KvStore>>;

/// 编码为存储文本
pub fn encode(value: &Value) -> String {
    value.to_string()
}

/// 尽力解码：能解析为 JSON 就返回 JSON，否则原样作为字符串
pub fn decode(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// 读取并解析记录，形状不符的记录视为不存在
pub async fn load_record<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let value = match store.get(key).await? {
        Some(value) => value,
        None => return Ok(None),
    };

    match serde_json::from_value(value) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "Discarding malformed record");
            Ok(None)
        }
    }
}

/// 序列化并写入记录
pub async fn save_record<T: Serialize>(
    store: &dyn KvStore,
    key: &str,
    record: &T,
    ttl_secs: u64,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(record)?;
    store.put(key, value, ttl_secs).await
}
