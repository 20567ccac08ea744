//! HTTP surface: routing, handlers, auth and CORS

pub mod auth;
pub mod cors;
pub mod docs;
pub mod handlers;
pub mod jwks;
pub mod jwt;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use crate::crypto::LazyCipher;
use crate::services::LinkService;

pub use cors::CorsPolicy;
pub use jwt::{AuthError, FirebaseClaims, TokenVerifier};
pub use routes::{ROUTE_TABLE, configure, resolve};

/// Shared, immutable per-worker state
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub cipher: Arc<LazyCipher>,
    pub verifier: Arc<TokenVerifier>,
    pub cors: CorsPolicy,
    /// `/healthz` requires `?t=<token>` when set
    pub health_token: Option<String>,
    /// Overrides the request origin in returned links
    pub public_base_url: Option<String>,
}
