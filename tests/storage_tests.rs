//! Storage backend tests
//!
//! Exercises the in-memory KV store and the backend factory; the Redis
//! adapter needs a live server and is covered by unit tests only.

use std::sync::Arc;

use edgelink::config::StaticConfig;
use edgelink::errors::EdgelinkError;
use edgelink::services::LinkService;
use edgelink::storage::{KvStore, LinkOwner, MemoryKvStore, ShortLinkRecord, StorageFactory};

fn memory_config() -> StaticConfig {
    let mut config = StaticConfig::default();
    config.storage.backend = "memory".to_string();
    config
}

// =============================================================================
// MemoryKvStore
// =============================================================================

#[tokio::test]
async fn test_memory_store_len_tracks_distinct_keys() {
    let store = MemoryKvStore::new();
    assert_eq!(store.len().await.unwrap(), Some(0));

    store.put("aaa111", "1".to_string()).await.unwrap();
    store.put("bbb222", "2".to_string()).await.unwrap();
    store.put("aaa111", "3".to_string()).await.unwrap();

    assert_eq!(store.len().await.unwrap(), Some(2));
    assert_eq!(store.get("aaa111").await.unwrap().as_deref(), Some("3"));
}

#[tokio::test]
async fn test_memory_store_ping_and_name() {
    let store = MemoryKvStore::new();
    assert!(store.ping().await.is_ok());
    assert_eq!(store.backend_name(), "memory");
}

#[tokio::test]
async fn test_memory_store_concurrent_writes() {
    let store = Arc::new(MemoryKvStore::new());
    let mut handles = Vec::new();

    for i in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .put(&format!("code{:02}", i), format!("value-{}", i))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.len().await.unwrap(), Some(16));
}

// =============================================================================
// StorageFactory
// =============================================================================

#[test]
fn test_factory_backend_name_is_case_insensitive() {
    let mut config = memory_config();
    config.storage.backend = "  Memory ".to_string();
    let store = StorageFactory::create(&config).expect("memory store");
    assert_eq!(store.backend_name(), "memory");
}

#[test]
fn test_factory_redis_with_url() {
    let mut config = memory_config();
    config.storage.backend = "redis".to_string();
    config.storage.redis_url = "redis://127.0.0.1:6379/".to_string();
    // 构造时不连接
    let store = StorageFactory::create(&config).expect("redis store");
    assert_eq!(store.backend_name(), "redis");
}

#[test]
fn test_factory_invalid_redis_url() {
    let mut config = memory_config();
    config.storage.backend = "redis".to_string();
    config.storage.redis_url = "definitely not a url".to_string();
    let err = StorageFactory::create(&config).err().expect("should fail");
    assert!(matches!(err, EdgelinkError::Configuration(_)));
}

// =============================================================================
// Stored record layout
// =============================================================================

#[tokio::test]
async fn test_service_writes_camel_case_json() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let service = LinkService::new(Arc::clone(&store));
    let owner = LinkOwner {
        user_id: "uid-42".to_string(),
        email: Some("owner@example.com".to_string()),
    };

    let created = service
        .shorten("https://example.com/page", Some(&owner))
        .await
        .unwrap();

    let raw = store.get(&created.code).await.unwrap().expect("stored");
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["url"], "https://example.com/page");
    assert_eq!(json["clicks"], 0);
    assert_eq!(json["userId"], "uid-42");
    assert_eq!(json["userEmail"], "owner@example.com");
    assert!(json["lastAccessed"].is_null());
    assert!(json["createdAt"].as_str().unwrap().ends_with('Z'));

    let record: ShortLinkRecord = serde_json::from_str(&raw).unwrap();
    assert_eq!(record.user_id.as_deref(), Some("uid-42"));
}
