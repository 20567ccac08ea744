//! Declarative route table
//!
//! Routes are matched in table order by [`resolve`], a pure function of the
//! method and path. Actix only sees a single `default_service` that hands the
//! request to [`dispatch`].

use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use tracing::{debug, trace};

use super::AppState;
use super::auth::authenticate;
use super::handlers::{self, json_error};
use crate::utils::is_valid_short_code;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
    Options,
}

impl RouteMethod {
    /// HEAD 按 GET 路由
    pub fn from_http(method: &Method) -> Option<Self> {
        match *method {
            Method::GET | Method::HEAD => Some(RouteMethod::Get),
            Method::POST => Some(RouteMethod::Post),
            Method::OPTIONS => Some(RouteMethod::Options),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    Any,
    Exact(&'static str),
    /// Matches the prefix and captures everything after it
    Prefix(&'static str),
    /// `/` followed by exactly one 6-character Base62 segment
    ShortCode,
}

impl PathPattern {
    /// Returns the captured segment (empty for patterns without one)
    pub fn capture<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            PathPattern::Any => Some(""),
            PathPattern::Exact(p) => (path == *p).then_some(""),
            PathPattern::Prefix(p) => path.strip_prefix(*p),
            PathPattern::ShortCode => path
                .strip_prefix('/')
                .filter(|code| is_valid_short_code(code)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    Preflight,
    Shorten,
    Stats,
    Encrypt,
    EncryptedRedirect,
    DecryptPath,
    DecryptBody,
    Health,
    Docs,
    Redirect,
}

#[derive(Debug)]
pub struct Route {
    pub method: RouteMethod,
    pub pattern: PathPattern,
    /// Requires a valid bearer token
    pub auth: bool,
    pub action: RouteAction,
}

const fn route(method: RouteMethod, pattern: PathPattern, auth: bool, action: RouteAction) -> Route {
    Route {
        method,
        pattern,
        auth,
        action,
    }
}

pub static ROUTE_TABLE: &[Route] = &[
    route(RouteMethod::Options, PathPattern::Any, false, RouteAction::Preflight),
    route(RouteMethod::Post, PathPattern::Exact("/shorten"), true, RouteAction::Shorten),
    route(RouteMethod::Get, PathPattern::Prefix("/stats/"), false, RouteAction::Stats),
    route(RouteMethod::Post, PathPattern::Exact("/encrypt"), true, RouteAction::Encrypt),
    route(RouteMethod::Get, PathPattern::Prefix("/e/"), false, RouteAction::EncryptedRedirect),
    route(RouteMethod::Get, PathPattern::Prefix("/decrypt/"), false, RouteAction::DecryptPath),
    route(RouteMethod::Post, PathPattern::Exact("/decrypt"), false, RouteAction::DecryptBody),
    route(RouteMethod::Get, PathPattern::Exact("/healthz"), false, RouteAction::Health),
    route(RouteMethod::Get, PathPattern::Exact("/"), false, RouteAction::Docs),
    route(RouteMethod::Get, PathPattern::ShortCode, false, RouteAction::Redirect),
];

#[derive(Debug)]
pub struct ResolvedRoute<'a> {
    pub route: &'static Route,
    pub capture: &'a str,
}

/// First matching route for `method` and `path`
pub fn resolve<'a>(method: &Method, path: &'a str) -> Option<ResolvedRoute<'a>> {
    let method = RouteMethod::from_http(method)?;
    ROUTE_TABLE.iter().find_map(|route| {
        if route.method != method {
            return None;
        }
        route
            .pattern
            .capture(path)
            .map(|capture| ResolvedRoute { route, capture })
    })
}

/// Reads the request body, enforcing [`MAX_BODY_BYTES`]
///
/// Errors come back as ready-made JSON responses so they still get CORS.
async fn read_body(mut payload: web::Payload) -> Result<web::Bytes, HttpResponse> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            debug!("Request body read failed: {}", e);
            json_error(StatusCode::BAD_REQUEST, "Invalid request body")
        })?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            debug!("Request body exceeds {} bytes", MAX_BODY_BYTES);
            return Err(json_error(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large",
            ));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

/// Single entry point for every request
pub async fn dispatch(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> HttpResponse {
    let Some(resolved) = resolve(req.method(), req.path()) else {
        trace!("No route for {} {}", req.method(), req.path());
        return state
            .cors
            .apply(&req, json_error(StatusCode::NOT_FOUND, "Not found"));
    };

    let action = resolved.route.action;
    let claims = if resolved.route.auth {
        match authenticate(&req, &state.verifier).await {
            Ok(claims) => Some(claims),
            Err(resp) => return state.cors.apply(&req, resp),
        }
    } else {
        None
    };

    let body = match read_body(payload).await {
        Ok(body) => body,
        Err(resp) => return state.cors.apply(&req, resp),
    };

    let capture = resolved.capture;
    let response = match action {
        RouteAction::Preflight => state.cors.preflight(&req),
        RouteAction::Shorten => handlers::links::shorten(&req, &body, &state, claims.as_ref()).await,
        RouteAction::Stats => handlers::links::stats(capture, &state).await,
        RouteAction::Redirect => handlers::links::redirect(capture, &state).await,
        RouteAction::Encrypt => handlers::encrypted::encrypt(&req, &body, &state),
        RouteAction::EncryptedRedirect => handlers::encrypted::redirect(capture, &state),
        RouteAction::DecryptPath => handlers::encrypted::decrypt_path(capture, &state),
        RouteAction::DecryptBody => handlers::encrypted::decrypt_body(&req, &body, &state),
        RouteAction::Health => handlers::system::health(&req, &state).await,
        RouteAction::Docs => handlers::system::docs(&req, &state).await,
    };

    state.cors.apply(&req, response)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.default_service(web::to(dispatch));
}
