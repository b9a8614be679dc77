//! API module
//!
//! Contains the route table and the HTTP request handlers for the record
//! service.

pub mod greetings;
pub mod middleware;
pub mod queries;
pub mod records;
pub mod utils;

use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router over the given state
///
/// Unknown paths, and known paths hit with an unsupported method, answer
/// `404 Not Found`. Paths are matched without regard to one trailing slash
/// or the case of their first segment, so `/DATA/` reaches `GET /data`.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(greetings::hello_world).fallback(greetings::not_found))
        .route(
            "/data",
            get(records::list_records)
                .post(records::create_record)
                .fallback(greetings::not_found),
        )
        .route(
            "/data/:id",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record)
                .fallback(greetings::not_found),
        )
        .route(
            "/user/:username",
            get(greetings::greet_user).fallback(greetings::not_found),
        )
        .route(
            "/search",
            get(queries::search_records).fallback(greetings::not_found),
        )
        .route(
            "/sort/:field",
            get(queries::sort_records).fallback(greetings::not_found),
        )
        .route(
            "/average/:field",
            get(queries::average_field).fallback(greetings::not_found),
        )
        .route(
            "/median/:field",
            get(queries::median_field).fallback(greetings::not_found),
        )
        .fallback(greetings::not_found)
        .with_state(state);

    // Route through a fallback so the path is rewritten before matching
    Router::new()
        .fallback_service(routes)
        .layer(axum::middleware::map_request(middleware::normalize_path))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Allow CORS for development
}
