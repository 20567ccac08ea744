//! Health probe and the documentation page

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::{public_origin, query_param};
use crate::api::AppState;
use crate::api::docs::render_docs;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub has_kv: bool,
    pub backend: &'static str,
    pub links_count: Option<u64>,
    pub encryption_key_configured: bool,
}

fn token_matches(expected: &str, provided: Option<&str>) -> bool {
    provided.is_some_and(|p| bool::from(p.as_bytes().ct_eq(expected.as_bytes())))
}

/// GET /healthz
pub async fn health(req: &HttpRequest, state: &AppState) -> HttpResponse {
    if let Some(expected) = state.health_token.as_deref() {
        let provided = query_param(req, "t");
        if !token_matches(expected, provided.as_deref()) {
            debug!("Health probe rejected: bad token");
            return HttpResponse::build(StatusCode::FORBIDDEN)
                .content_type("text/plain; charset=utf-8")
                .body("Forbidden");
        }
    }

    let links_count = match state.link_service.count().await {
        Ok(count) => count,
        Err(e) => {
            warn!("Health probe could not count links: {}", e);
            None
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        has_kv: true,
        backend: state.link_service.backend_name(),
        links_count,
        encryption_key_configured: state.cipher.is_configured(),
    })
}

/// GET /
pub async fn docs(req: &HttpRequest, state: &AppState) -> HttpResponse {
    let links_count = state.link_service.count().await.unwrap_or_else(|e| {
        warn!("Docs page could not count links: {}", e);
        None
    });
    let origin = public_origin(req, state);

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_docs(&origin, links_count))
}
