//! Per-request CORS headers
//!
//! The allow-origin value is resolved from the request's `Origin`: wildcard
//! config or no origin gives `*`, a listed origin is echoed, anything else
//! gets the literal `null`.

use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpRequest, HttpResponse};

pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const PREFLIGHT_MAX_AGE: &str = "86400";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsPolicy {
    #[default]
    AnyOrigin,
    AllowList(Vec<String>),
}

impl CorsPolicy {
    /// Parses a comma-separated list; empty or `*` means any origin
    pub fn from_allowed_origins(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "*" {
            return CorsPolicy::AnyOrigin;
        }
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if origins.is_empty() {
            CorsPolicy::AnyOrigin
        } else {
            CorsPolicy::AllowList(origins)
        }
    }

    pub fn resolve_origin<'a>(&self, origin: Option<&'a str>) -> &'a str {
        match (self, origin) {
            (CorsPolicy::AnyOrigin, _) | (_, None) => "*",
            (CorsPolicy::AllowList(list), Some(origin)) => {
                if list.iter().any(|o| o == origin) {
                    origin
                } else {
                    "null"
                }
            }
        }
    }

    fn request_origin(req: &HttpRequest) -> Option<&str> {
        req.headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
    }

    /// Adds the CORS headers to an outgoing response
    pub fn apply(&self, req: &HttpRequest, mut response: HttpResponse) -> HttpResponse {
        let allow_origin = self.resolve_origin(Self::request_origin(req));
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(allow_origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        response
    }

    /// 200 with an empty body
    pub fn preflight(&self, req: &HttpRequest) -> HttpResponse {
        let mut response = self.apply(req, HttpResponse::Ok().finish());
        response.headers_mut().insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );
        response
    }
}
