//! Short link business logic
//!
//! Shared by the HTTP handlers; owns the uniqueness probe and the click
//! counter. The store handle is injected at construction time.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::{EdgelinkError, Result};
use crate::storage::{KvStore, LinkOwner, ShortLinkRecord};
use crate::utils::{SHORT_CODE_LENGTH, generate_random_code, is_valid_url};

/// Candidate codes tried before giving up
pub const MAX_CODE_ATTEMPTS: usize = 10;

pub type CodeGenerator = fn(usize) -> String;

/// Result of a successful shorten
#[derive(Debug, Clone)]
pub struct ShortenedLink {
    pub code: String,
    pub record: ShortLinkRecord,
}

pub struct LinkService {
    store: Arc<dyn KvStore>,
    code_generator: CodeGenerator,
}

impl LinkService {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            code_generator: generate_random_code,
        }
    }

    /// Replaces the random code source (tests use a fixed sequence)
    pub fn with_code_generator(mut self, generator: CodeGenerator) -> Self {
        self.code_generator = generator;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Creates a record for `url` under a fresh code
    pub async fn shorten(&self, url: &str, owner: Option<&LinkOwner>) -> Result<ShortenedLink> {
        let url = url.trim();
        if url.is_empty() {
            return Err(EdgelinkError::validation("URL is required"));
        }
        if !is_valid_url(url) {
            return Err(EdgelinkError::validation("Invalid URL format"));
        }

        let code = self.find_free_code().await?;
        let record = ShortLinkRecord::new(url, owner);
        self.store
            .put(&code, serde_json::to_string(&record)?)
            .await?;

        info!(
            "Short link created: {} -> {} (user: {:?})",
            code, url, record.user_id
        );
        Ok(ShortenedLink { code, record })
    }

    /// 先查后写，不加锁；并发下两个请求可能拿到同一个 code
    async fn find_free_code(&self) -> Result<String> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let candidate = (self.code_generator)(SHORT_CODE_LENGTH);
            if self.store.get(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            debug!("Code collision on attempt {}: {}", attempt, candidate);
        }
        warn!(
            "No free short code after {} attempts",
            MAX_CODE_ATTEMPTS
        );
        Err(EdgelinkError::code_exhausted("Failed to generate unique code"))
    }

    async fn load(&self, code: &str) -> Result<ShortLinkRecord> {
        let raw = self
            .store
            .get(code)
            .await?
            .ok_or_else(|| EdgelinkError::not_found("Short URL not found"))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Looks up `code`, counts the click and returns the target URL
    pub async fn resolve_and_count(&self, code: &str) -> Result<String> {
        let mut record = self.load(code).await?;
        record.record_click(Utc::now());
        self.store
            .put(code, serde_json::to_string(&record)?)
            .await?;

        debug!("Redirect {} -> {} (clicks: {})", code, record.url, record.clicks);
        Ok(record.url)
    }

    pub async fn stats(&self, code: &str) -> Result<ShortLinkRecord> {
        self.load(code).await
    }

    /// Number of stored links, when the backend can tell
    pub async fn count(&self) -> Result<Option<u64>> {
        self.store.len().await
    }
}
