//! Request handlers and the small helpers they share

pub mod encrypted;
pub mod links;
pub mod system;

use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::{Value, json};
use tracing::{error, warn};
use url::Url;

use super::AppState;
use crate::errors::EdgelinkError;

/// `{"error": message}` with the given status
pub fn json_error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}

/// Maps a crate error onto the JSON error body
///
/// Storage and serialization failures are reported as
/// `{"error":"internal","detail":...}`.
pub fn error_response(err: &EdgelinkError) -> HttpResponse {
    match err {
        EdgelinkError::StorageOperation(_) | EdgelinkError::Serialization(_) => {
            error!("{}", err.format_simple());
            HttpResponse::build(err.status_code()).json(json!({
                "error": "internal",
                "detail": err.message(),
            }))
        }
        EdgelinkError::Configuration(_) => {
            error!("{}", err.format_simple());
            json_error(err.status_code(), err.message())
        }
        _ => json_error(err.status_code(), err.message()),
    }
}

/// Body parsed as a JSON object; anything else counts as no body
pub(crate) fn json_body(body: &[u8]) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice::<Value>(body)
        .ok()
        .filter(Value::is_object)
}

/// Non-empty string field of a JSON body
pub(crate) fn body_field(body: Option<&Value>, field: &str) -> Option<String> {
    body.and_then(|b| b.get(field))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Non-empty query parameter
pub(crate) fn query_param(req: &HttpRequest, name: &str) -> Option<String> {
    web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .ok()
        .and_then(|q| q.get(name).cloned())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Public origin used to build returned links
pub(crate) fn public_origin(req: &HttpRequest, state: &AppState) -> String {
    if let Some(base) = state.public_base_url.as_deref() {
        return base.trim_end_matches('/').to_string();
    }
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

/// 302 to `location`, serialized by `url` so the header stays ASCII
pub(crate) fn redirect_to(location: &str) -> HttpResponse {
    match Url::parse(location) {
        Ok(url) => HttpResponse::Found()
            .insert_header(("Location", url.as_str()))
            .finish(),
        Err(e) => {
            warn!("Refusing to redirect to unparsable URL {:?}: {}", location, e);
            json_error(StatusCode::BAD_REQUEST, "Invalid URL")
        }
    }
}
