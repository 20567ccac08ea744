//! Key-value storage
//!
//! The link service only needs `get` / `put` against a string-keyed store.
//! `RedisKvStore` is the durable remote adapter; `MemoryKvStore` is a
//! process-local map for development and tests.

pub mod backends;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::StaticConfig;
use crate::errors::{EdgelinkError, Result};

pub use backends::{MemoryKvStore, RedisKvStore};
pub use models::{LinkOwner, ShortLinkRecord};

/// Eventually-consistent string key-value store.
///
/// Writes are not guaranteed to be visible to every subsequent read;
/// callers must not rely on read-your-writes across nodes.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: String) -> Result<()>;

    /// Number of stored keys, `None` when the backend cannot count cheaply
    async fn len(&self) -> Result<Option<u64>> {
        Ok(None)
    }

    /// Reachability check used at startup
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StaticConfig) -> Result<Arc<dyn KvStore>> {
        let backend = config.storage.backend.trim().to_ascii_lowercase();

        let store: Arc<dyn KvStore> = match backend.as_str() {
            "redis" => {
                if config.storage.redis_url.trim().is_empty() {
                    return Err(EdgelinkError::configuration(
                        "KV binding is not configured: storage.redis_url is empty",
                    ));
                }
                Arc::new(RedisKvStore::new(
                    &config.storage.redis_url,
                    &config.storage.key_prefix,
                )?)
            }
            "memory" => {
                if config.is_production() {
                    return Err(EdgelinkError::configuration(
                        "The in-memory store is for development only; configure storage.backend = \"redis\" in production",
                    ));
                }
                warn!("Using in-memory KV store: data is lost on restart");
                Arc::new(MemoryKvStore::new())
            }
            other => {
                return Err(EdgelinkError::configuration(format!(
                    "Unknown storage backend '{}'. Supported: redis, memory",
                    other
                )));
            }
        };

        info!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_rejects_missing_redis_binding() {
        let mut config = StaticConfig::default();
        config.storage.backend = "redis".to_string();
        let err = StorageFactory::create(&config).err().expect("should fail");
        assert!(matches!(err, EdgelinkError::Configuration(_)));
    }

    #[test]
    fn test_factory_rejects_memory_in_production() {
        let mut config = StaticConfig::default();
        config.server.environment = "production".to_string();
        let err = StorageFactory::create(&config).err().expect("should fail");
        assert!(matches!(err, EdgelinkError::Configuration(_)));
    }

    #[test]
    fn test_factory_rejects_unknown_backend() {
        let mut config = StaticConfig::default();
        config.storage.backend = "sled".to_string();
        assert!(StorageFactory::create(&config).is_err());
    }

    #[test]
    fn test_factory_memory_backend() {
        let config = StaticConfig::default();
        let store = StorageFactory::create(&config).expect("memory store");
        assert_eq!(store.backend_name(), "memory");
    }
}
