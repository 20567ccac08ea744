use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use crate::errors::Result;
use crate::storage::KvStore;

/// Process-local store for development and tests
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.entries.lock().get(key).cloned();
        trace!("memory get {} -> hit={}", key, value.is_some());
        Ok(value)
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn len(&self) -> Result<Option<u64>> {
        Ok(Some(self.entries.lock().len() as u64))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
