//! Shared helpers for the HTTP integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};

use edgelink::api::jwks::{JwkSource, JwksCache};
use edgelink::api::{AppState, AuthError, CorsPolicy, TokenVerifier};
use edgelink::crypto::LazyCipher;
use edgelink::services::LinkService;
use edgelink::storage::{KvStore, MemoryKvStore};

pub const PROJECT: &str = "test-project";
pub const SIGNING_KID: &str = "edgelink-test-key";

const SIGNING_KEY_PEM: &str = include_str!("../fixtures/jwt_signing_key.pem");
const JWKS_JSON: &str = include_str!("../fixtures/jwks.json");

/// Builds an initialised actix test service for `state`
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure(edgelink::api::routes::configure),
        )
        .await
    };
}

pub struct TestOptions {
    pub encryption_key: Option<String>,
    pub health_token: Option<String>,
    pub allowed_origins: String,
    pub public_base_url: Option<String>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            encryption_key: Some(encryption_key()),
            health_token: None,
            allowed_origins: "*".to_string(),
            public_base_url: None,
        }
    }
}

/// 32 字节 AES-256 密钥
pub fn encryption_key() -> String {
    URL_SAFE_NO_PAD.encode([7u8; 32])
}

pub fn state_with(store: Arc<dyn KvStore>, options: TestOptions) -> AppState {
    AppState {
        link_service: Arc::new(LinkService::new(store)),
        cipher: Arc::new(LazyCipher::new(options.encryption_key)),
        verifier: Arc::new(TokenVerifier::claims_only(PROJECT)),
        cors: CorsPolicy::from_allowed_origins(&options.allowed_origins),
        health_token: options.health_token,
        public_base_url: options.public_base_url,
    }
}

pub fn memory_state(options: TestOptions) -> (Arc<MemoryKvStore>, AppState) {
    let store = Arc::new(MemoryKvStore::new());
    let state = state_with(store.clone(), options);
    (store, state)
}

pub fn default_state() -> AppState {
    memory_state(TestOptions::default()).1
}

/// Claims that pass every check right now
pub fn valid_claims() -> Value {
    let now = Utc::now().timestamp();
    json!({
        "exp": now + 3600,
        "iat": now - 10,
        "auth_time": now - 10,
        "aud": PROJECT,
        "iss": format!("https://securetoken.google.com/{}", PROJECT),
        "sub": "user-123",
        "email": "user@example.com",
    })
}

pub fn mint_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","kid":"test","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn auth_header() -> (&'static str, String) {
    bearer(&mint_token(&valid_claims()))
}

/// Serves the public half of the fixture signing key
struct FixtureKeys(JwkSet);

#[async_trait]
impl JwkSource for FixtureKeys {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        Ok(self.0.clone())
    }
}

pub fn signature_verifier() -> TokenVerifier {
    let keys: JwkSet = serde_json::from_str(JWKS_JSON).expect("fixture JWKS");
    let cache = JwksCache::new(Arc::new(FixtureKeys(keys)), Duration::from_secs(3600));
    TokenVerifier::with_signature_verification(PROJECT, Arc::new(cache))
}

/// Default state, but tokens must carry a valid RS256 signature
pub fn signed_state() -> AppState {
    let mut state = default_state();
    state.verifier = Arc::new(signature_verifier());
    state
}

/// RS256 token signed with the fixture key
pub fn mint_signed_token(claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(SIGNING_KID.to_string());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY_PEM.as_bytes()).expect("fixture PEM");
    encode(&header, claims, &key).expect("sign token")
}
