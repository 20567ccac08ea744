//! Google securetoken JWKS: fetch, cache, verify RS256 signatures

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use ureq::Agent;

use super::jwt::AuthError;

const HTTP_TIMEOUT_SECS: u64 = 5;
/// Minimum age of the cached set before an unknown `kid` may trigger a refetch
const REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// Where public keys come from
#[async_trait]
pub trait JwkSource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches the key set over HTTP
pub struct RemoteJwkSource {
    url: String,
}

impl RemoteJwkSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// 同步请求，在 spawn_blocking 中调用
    fn fetch_sync(url: String) -> Result<JwkSet, AuthError> {
        let resp = get_agent().get(&url).call().map_err(|e| {
            warn!("JWKS request to \"{}\" failed: {}", url, e);
            AuthError::KeySetUnavailable(e.to_string())
        })?;

        resp.into_body().read_json::<JwkSet>().map_err(|e| {
            warn!("JWKS response from \"{}\" parse failed: {}", url, e);
            AuthError::KeySetUnavailable(e.to_string())
        })
    }
}

#[async_trait]
impl JwkSource for RemoteJwkSource {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let url = self.url.clone();
        tokio::task::spawn_blocking(move || Self::fetch_sync(url))
            .await
            .unwrap_or_else(|e| {
                warn!("JWKS spawn_blocking failed: {}", e);
                Err(AuthError::KeySetUnavailable(e.to_string()))
            })
    }
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

pub struct JwksCache {
    source: Arc<dyn JwkSource>,
    ttl: Duration,
    refresh_cooldown: Duration,
    cached: RwLock<Option<CachedKeys>>,
    /// 同一时间只允许一个请求去拉取
    refresh_lock: Mutex<()>,
}

impl JwksCache {
    pub fn new(source: Arc<dyn JwkSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            refresh_cooldown: REFRESH_COOLDOWN,
            cached: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.refresh_cooldown = cooldown;
        self
    }

    pub fn remote(url: &str, ttl_secs: u64) -> Self {
        info!("JWKS signature verification enabled: {}", url);
        Self::new(
            Arc::new(RemoteJwkSource::new(url)),
            Duration::from_secs(ttl_secs),
        )
    }

    /// Cached set if still usable; a forced refresh inside the cooldown reuses it
    fn cached_keys(&self, force_refresh: bool) -> Option<JwkSet> {
        let guard = self.cached.read();
        let cached = guard.as_ref()?;
        let age = cached.fetched_at.elapsed();
        let usable = age < self.ttl && (!force_refresh || age < self.refresh_cooldown);
        usable.then(|| cached.keys.clone())
    }

    async fn keys(&self, force_refresh: bool) -> Result<JwkSet, AuthError> {
        if let Some(keys) = self.cached_keys(force_refresh) {
            return Ok(keys);
        }

        let _refresh = self.refresh_lock.lock().await;
        // 双重检查，等锁期间可能已被其他请求刷新
        if let Some(keys) = self.cached_keys(force_refresh) {
            return Ok(keys);
        }

        let keys = self.source.fetch().await?;
        debug!("JWKS refreshed: {} keys", keys.keys.len());
        *self.cached.write() = Some(CachedKeys {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }

    /// Checks the RS256 signature of `token`
    ///
    /// An unknown `kid` triggers at most one refresh, and none while the
    /// cached set is younger than the refresh cooldown.
    pub async fn verify(&self, token: &str, audience: &str, issuer: &str) -> Result<(), AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::Malformed)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }
        let kid = header.kid.ok_or(AuthError::Malformed)?;

        let mut keys = self.keys(false).await?;
        if keys.find(&kid).is_none() {
            debug!("Unknown kid {}, refreshing JWKS", kid);
            keys = self.keys(true).await?;
        }
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?;

        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);

        decode::<serde_json::Value>(token, &key, &validation)
            .map(|_| ())
            .map_err(|e| AuthError::InvalidSignature(e.to_string()))
    }
}
