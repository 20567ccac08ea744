use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use crate::errors::{EdgelinkError, Result};
use crate::storage::KvStore;

/// Durable KV adapter backed by Redis.
///
/// Every key is stored as `<prefix><short code>`; values are the JSON records
/// written by the link service.
pub struct RedisKvStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisKvStore {
    pub fn new(url: &str, key_prefix: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            EdgelinkError::configuration(format!("Invalid storage.redis_url '{}': {}", url, e))
        })?;

        debug!("RedisKvStore created with prefix: '{}'", key_prefix);

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: key_prefix.to_string(),
        })
    }

    async fn check_connection(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let response: String = redis::cmd("PING").query_async(&mut conn).await?;
        debug!("Redis connection test successful: {}", response);
        Ok(())
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let redis_key = self.make_key(key);
        let mut conn = self.get_connection().await?;

        match conn.get::<_, Option<String>>(&redis_key).await {
            Ok(value) => {
                trace!("redis get {} -> hit={}", key, value.is_some());
                Ok(value)
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                // 连接可能已断开，重置连接
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let redis_key = self.make_key(key);
        let mut conn = self.get_connection().await?;

        match conn.set::<_, _, ()>(&redis_key, value).await {
            Ok(()) => {
                trace!("Successfully stored key: {}", key);
                Ok(())
            }
            Err(e) => {
                error!("Failed to store key '{}': {}", key, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    /// 启动时检查 Redis 是否可达
    async fn ping(&self) -> Result<()> {
        self.check_connection().await
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key_uses_prefix() {
        let store = RedisKvStore::new("redis://127.0.0.1:6379/", "edgelink:").unwrap();
        assert_eq!(store.make_key("abc123"), "edgelink:abc123");
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let err = RedisKvStore::new("not-a-redis-url", "x:").err().unwrap();
        assert!(matches!(err, EdgelinkError::Configuration(_)));
    }
}
