use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use serde_json::Value;

use super::{KvStore, decode, encode};
use crate::error::StoreError;

/// Redis 存储
///
/// 每次操作取一个多路复用连接，Redis 暂时不可用时不会影响启动，
/// 恢复后下一次操作即可重新连上。
#[derive(Clone)]
pub struct RedisStore {
    redis: Arc<RedisClient>,
    op_timeout: Duration,
}

impl RedisStore {
    pub fn open(redis_url: &str, op_timeout: Duration) -> Result<Self, StoreError> {
        let client = RedisClient::open(redis_url)?;
        Ok(Self::new(Arc::new(client), op_timeout))
    }

    pub fn new(redis: Arc<RedisClient>, op_timeout: Duration) -> Self {
        Self { redis, op_timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.op_timeout))?
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.bounded(async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;
            let result: Option<String> = conn.get(key).await?;
            Ok::<_, StoreError>(result.as_deref().map(decode))
        })
        .await
    }

    async fn put(&self, key: &str, value: Value, ttl_secs: u64) -> Result<(), StoreError> {
        // SET EX 不接受 0 秒
        let ttl = ttl_secs.max(1);
        let json = encode(&value);
        self.bounded(async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;
            let _: () = conn.set_ex(key, json, ttl).await?;
            Ok::<_, StoreError>(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.bounded(async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;
            let _: () = conn.del(key).await?;
            Ok::<_, StoreError>(())
        })
        .await
    }
}
