//! URL 验证模块
//!
//! Short links and encrypted links accept only absolute `http://` / `https://` URLs.

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证 URL
///
/// 1. URL 不为空
/// 2. 能被解析为绝对 URL
/// 3. scheme 必须是 http 或 https（javascript:, data:, file: 等一律拒绝）
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    if url.trim().is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(UrlValidationError::InvalidProtocol(format!("{}:", other))),
    }
}

#[inline]
pub fn is_valid_url(url: &str) -> bool {
    validate_url(url).is_ok()
}
