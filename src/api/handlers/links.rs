//! Persistent short links: shorten, redirect, stats

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::{debug, trace};

use super::{body_field, error_response, json_body, json_error, public_origin, query_param, redirect_to};
use crate::api::AppState;
use crate::api::jwt::FirebaseClaims;
use crate::storage::LinkOwner;
use crate::storage::models::iso_millis;
use crate::utils::is_valid_short_code;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub clicks: u64,
    pub created_at: String,
    pub last_accessed: Option<String>,
}

/// POST /shorten
pub async fn shorten(
    req: &HttpRequest,
    body: &[u8],
    state: &AppState,
    claims: Option<&FirebaseClaims>,
) -> HttpResponse {
    let body = json_body(body);
    let url = body_field(body.as_ref(), "url")
        .or_else(|| query_param(req, "url"))
        .unwrap_or_default();

    let owner = claims.map(|c| LinkOwner {
        user_id: c.sub.clone(),
        email: c.email.clone(),
    });

    match state.link_service.shorten(&url, owner.as_ref()).await {
        Ok(link) => {
            let origin = public_origin(req, state);
            HttpResponse::Ok().json(ShortenResponse {
                short_url: format!("{}/{}", origin, link.code),
                short_code: link.code,
                original_url: link.record.url,
            })
        }
        Err(e) => {
            debug!("Shorten rejected: {}", e);
            error_response(&e)
        }
    }
}

/// GET /{code}
pub async fn redirect(code: &str, state: &AppState) -> HttpResponse {
    match state.link_service.resolve_and_count(code).await {
        Ok(url) => redirect_to(&url),
        Err(e) => error_response(&e),
    }
}

/// GET /stats/{code}
pub async fn stats(code: &str, state: &AppState) -> HttpResponse {
    // 格式不对的 code 不查存储
    if !is_valid_short_code(code) {
        trace!("Invalid short code rejected: {}", code);
        return json_error(StatusCode::NOT_FOUND, "Short URL not found");
    }

    match state.link_service.stats(code).await {
        Ok(record) => HttpResponse::Ok().json(StatsResponse {
            short_code: code.to_string(),
            original_url: record.url,
            clicks: record.clicks,
            created_at: iso_millis::format(&record.created_at),
            last_accessed: record.last_accessed.as_ref().map(iso_millis::format),
        }),
        Err(e) => error_response(&e),
    }
}
