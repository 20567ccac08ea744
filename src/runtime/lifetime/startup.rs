use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::{AppState, CorsPolicy, TokenVerifier};
use crate::config::StaticConfig;
use crate::crypto::LazyCipher;
use crate::services::LinkService;
use crate::storage::StorageFactory;

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// 根据配置构建共享状态（存储、加密、鉴权、CORS）
pub async fn prepare_app_state(config: &StaticConfig) -> Result<AppState> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StorageFactory::create(config).context("Failed to create storage backend")?;
    store
        .ping()
        .await
        .with_context(|| format!("Storage backend '{}' is unreachable", store.backend_name()))?;

    let cipher = LazyCipher::new(non_empty(&config.crypto.encryption_key));
    if cipher.is_configured() {
        info!("Encrypted links enabled (key is validated on first use)");
    } else {
        info!("Encrypted links disabled (crypto.encryption_key not set)");
    }

    let verifier = TokenVerifier::from_config(&config.auth);
    if !verifier.verifies_signature() {
        warn!(
            "Bearer tokens are checked by claims only (project '{}'); signatures are NOT verified. \
             Remove auth.verify_signature = false to verify against Google's published keys.",
            verifier.project_id()
        );
    }

    let health_token = non_empty(&config.api.health_token);
    if health_token.is_none() {
        info!("Health endpoint is open (api.health_token not set)");
    }

    let cors = CorsPolicy::from_allowed_origins(&config.cors.allowed_origins);
    debug!("CORS policy: {:?}", cors);

    let state = AppState {
        link_service: Arc::new(LinkService::new(store)),
        cipher: Arc::new(cipher),
        verifier: Arc::new(verifier),
        cors,
        health_token,
        public_base_url: non_empty(&config.server.public_base_url),
    };

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(state)
}
