//! Bearer token gate for protected routes

use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponse};
use tracing::{info, trace};

use super::handlers::error_response;
use super::jwt::{AuthError, FirebaseClaims, TokenVerifier, extract_bearer_token};
use crate::errors::EdgelinkError;

/// Validates the caller, or returns the ready-made 401 response
pub async fn authenticate(
    req: &HttpRequest,
    verifier: &TokenVerifier,
) -> Result<FirebaseClaims, HttpResponse> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let result = match extract_bearer_token(header) {
        Some(token) => verifier.verify(token).await,
        None => Err(AuthError::MissingToken),
    };

    match result {
        Ok(claims) => {
            trace!("Bearer token accepted for {}", claims.sub);
            Ok(claims)
        }
        Err(e) => {
            info!("Bearer token rejected: {}", e);
            Err(error_response(&EdgelinkError::from(e)))
        }
    }
}
