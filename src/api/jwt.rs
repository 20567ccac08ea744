//! Firebase ID token checks
//!
//! Claims are always checked against the configured project. Signature
//! verification against Google's published keys is optional and delegated
//! to [`JwksCache`].

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::jwks::JwksCache;
use crate::config::AuthConfig;
use crate::utils::decode_base64_lenient;

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// 缺少 Authorization: Bearer
    MissingToken,
    /// 不是三段式或 payload 无法解析
    Malformed,
    Expired,
    IssuedInFuture,
    AudienceMismatch,
    IssuerMismatch,
    InvalidAuthTime,
    MissingSubject,
    UnsupportedAlgorithm(String),
    UnknownKey(String),
    InvalidSignature(String),
    KeySetUnavailable(String),
}

impl AuthError {
    /// 对外只区分“没带 token”和“token 无效”
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Unauthorized: Missing token",
            _ => "Unauthorized: Invalid token",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "missing bearer token"),
            AuthError::Malformed => write!(f, "malformed token"),
            AuthError::Expired => write!(f, "token expired"),
            AuthError::IssuedInFuture => write!(f, "token issued in the future"),
            AuthError::AudienceMismatch => write!(f, "audience mismatch"),
            AuthError::IssuerMismatch => write!(f, "issuer mismatch"),
            AuthError::InvalidAuthTime => write!(f, "invalid auth_time"),
            AuthError::MissingSubject => write!(f, "missing subject"),
            AuthError::UnsupportedAlgorithm(alg) => write!(f, "unsupported algorithm: {}", alg),
            AuthError::UnknownKey(kid) => write!(f, "unknown signing key: {}", kid),
            AuthError::InvalidSignature(e) => write!(f, "invalid signature: {}", e),
            AuthError::KeySetUnavailable(e) => write!(f, "key set unavailable: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

/// Payload as it arrives; every field may be missing
#[derive(Debug, Default, Deserialize)]
struct RawClaims {
    #[serde(default)]
    exp: Option<f64>,
    #[serde(default)]
    iat: Option<f64>,
    #[serde(default)]
    auth_time: Option<f64>,
    #[serde(default)]
    aud: Option<String>,
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Claims of a token that passed every check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirebaseClaims {
    pub sub: String,
    pub email: Option<String>,
    pub aud: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub auth_time: i64,
}

/// 0 与缺失等价
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Strips the `Bearer ` prefix from an Authorization header value
pub fn extract_bearer_token(header: Option<&str>) -> Option<&str> {
    header.and_then(|h| h.strip_prefix("Bearer "))
}

pub struct TokenVerifier {
    project_id: String,
    issuer: String,
    jwks: Option<Arc<JwksCache>>,
}

impl TokenVerifier {
    /// Checks structure and claims only
    pub fn claims_only(project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        Self {
            issuer: format!("{}{}", ISSUER_PREFIX, project_id),
            project_id,
            jwks: None,
        }
    }

    pub fn with_signature_verification(project_id: impl Into<String>, jwks: Arc<JwksCache>) -> Self {
        Self {
            jwks: Some(jwks),
            ..Self::claims_only(project_id)
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        if config.verify_signature {
            let cache = JwksCache::remote(&config.jwks_url, config.jwks_cache_secs);
            Self::with_signature_verification(config.project_id.clone(), Arc::new(cache))
        } else {
            Self::claims_only(config.project_id.clone())
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn verifies_signature(&self) -> bool {
        self.jwks.is_some()
    }

    /// Claims checks against an explicit clock (seconds since epoch)
    pub fn verify_claims_at(&self, token: &str, now: i64) -> Result<FirebaseClaims, AuthError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(AuthError::Malformed);
        }

        let payload = decode_base64_lenient(parts[1]).ok_or(AuthError::Malformed)?;
        let raw: RawClaims = serde_json::from_slice(&payload).map_err(|e| {
            trace!("Token payload is not valid claims JSON: {}", e);
            AuthError::Malformed
        })?;

        let now_f = now as f64;

        let exp = present(raw.exp).ok_or(AuthError::Expired)?;
        if exp < now_f {
            return Err(AuthError::Expired);
        }

        let iat = present(raw.iat).ok_or(AuthError::IssuedInFuture)?;
        if iat > now_f {
            return Err(AuthError::IssuedInFuture);
        }

        let aud = raw.aud.ok_or(AuthError::AudienceMismatch)?;
        if aud != self.project_id {
            return Err(AuthError::AudienceMismatch);
        }

        let iss = raw.iss.ok_or(AuthError::IssuerMismatch)?;
        if iss != self.issuer {
            return Err(AuthError::IssuerMismatch);
        }

        let auth_time = present(raw.auth_time).ok_or(AuthError::InvalidAuthTime)?;
        if auth_time > now_f {
            return Err(AuthError::InvalidAuthTime);
        }

        let sub = raw
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingSubject)?;

        Ok(FirebaseClaims {
            sub,
            email: raw.email,
            aud,
            iss,
            iat: iat as i64,
            exp: exp as i64,
            auth_time: auth_time as i64,
        })
    }

    /// Full check: claims first, then the signature when enabled
    pub async fn verify(&self, token: &str) -> Result<FirebaseClaims, AuthError> {
        let claims = self.verify_claims_at(token, Utc::now().timestamp())?;

        if let Some(jwks) = &self.jwks {
            jwks.verify(token, &self.project_id, &self.issuer).await?;
            trace!("Token signature verified for sub={}", claims.sub);
        }

        debug!("Token accepted for sub={}", claims.sub);
        Ok(claims)
    }
}
