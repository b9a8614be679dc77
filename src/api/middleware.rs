//! Request middleware: path normalization and request logging

use axum::{
    extract::Request,
    http::{uri::PathAndQuery, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// Request ID middleware - adds unique ID to each request for tracing
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = start.elapsed().as_millis(),
        "Request completed"
    );

    response
}

/// Loose form of a request path, or `None` when it is already loose
///
/// Drops one trailing slash and lowercases the first segment. Later
/// segments carry ids and field names and keep their case.
pub fn normalize_route_path(path: &str) -> Option<String> {
    let trimmed = match path.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest,
        _ => path,
    };
    let rest = trimmed.strip_prefix('/')?;
    let (first, tail) = match rest.find('/') {
        Some(index) => rest.split_at(index),
        None => (rest, ""),
    };

    let normalized = format!("/{}{}", first.to_ascii_lowercase(), tail);
    (normalized != path).then_some(normalized)
}

/// Rewrite the request URI to its loose path before routing
pub async fn normalize_path(mut request: Request) -> Request {
    let Some(path) = normalize_route_path(request.uri().path()) else {
        return request;
    };
    let path_and_query = match request.uri().query() {
        Some(query) => format!("{}?{}", path, query),
        None => path,
    };

    let mut parts = request.uri().clone().into_parts();
    match path_and_query.parse::<PathAndQuery>() {
        Ok(path_and_query) => parts.path_and_query = Some(path_and_query),
        Err(e) => {
            debug!("Keeping request path {}: {}", request.uri(), e);
            return request;
        }
    }
    match Uri::from_parts(parts) {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => debug!("Keeping request path {}: {}", request.uri(), e),
    }
    request
}
