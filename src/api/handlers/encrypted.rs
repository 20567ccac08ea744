//! Stateless encrypted links

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::{body_field, error_response, json_body, json_error, public_origin, query_param, redirect_to};
use crate::api::AppState;
use crate::errors::EdgelinkError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptResponse {
    pub code: String,
    pub encrypted_url: String,
}

#[derive(Debug, Serialize)]
pub struct DecryptResponse {
    pub url: String,
}

/// POST /encrypt
pub fn encrypt(req: &HttpRequest, body: &[u8], state: &AppState) -> HttpResponse {
    let body = json_body(body);
    let url = body_field(body.as_ref(), "url")
        .or_else(|| query_param(req, "url"))
        .unwrap_or_default();

    match state.cipher.encrypt(&url) {
        Ok(code) => {
            let origin = public_origin(req, state);
            HttpResponse::Ok().json(EncryptResponse {
                encrypted_url: format!("{}/e/{}", origin, code),
                code,
            })
        }
        Err(e) => error_response(&EdgelinkError::from(e)),
    }
}

/// GET /e/{code}
pub fn redirect(code: &str, state: &AppState) -> HttpResponse {
    match state.cipher.decrypt(code) {
        Ok(url) => redirect_to(&url),
        Err(e) => {
            debug!("Encrypted link rejected: {}", e);
            json_error(StatusCode::BAD_REQUEST, "Invalid or expired link")
        }
    }
}

/// GET /decrypt/{code}
pub fn decrypt_path(code: &str, state: &AppState) -> HttpResponse {
    decrypt_response(code, state)
}

/// POST /decrypt
///
/// The code is taken from the first source that yields one: body `code`,
/// body `encryptedUrl`, query `code`.
pub fn decrypt_body(req: &HttpRequest, body: &[u8], state: &AppState) -> HttpResponse {
    let body = json_body(body);
    let code = body_field(body.as_ref(), "code")
        .or_else(|| {
            body_field(body.as_ref(), "encryptedUrl").and_then(|u| code_from_encrypted_url(&u))
        })
        .or_else(|| query_param(req, "code"))
        .unwrap_or_default();

    decrypt_response(&code, state)
}

fn decrypt_response(code: &str, state: &AppState) -> HttpResponse {
    match state.cipher.decrypt(code) {
        Ok(url) => HttpResponse::Ok().json(DecryptResponse { url }),
        Err(e) => {
            debug!("Decrypt rejected: {}", e);
            json_error(StatusCode::BAD_REQUEST, "Invalid code")
        }
    }
}

/// `https://host/e/<code>` -> `<code>`；不是 `/e/` 时去掉开头的斜杠
pub fn code_from_encrypted_url(encrypted_url: &str) -> Option<String> {
    let parsed = Url::parse(encrypted_url).ok()?;
    let path = parsed.path();
    let code = match path.strip_prefix("/e/") {
        Some(rest) => rest,
        None => path.trim_start_matches('/'),
    };
    (!code.is_empty()).then(|| code.to_string())
}
