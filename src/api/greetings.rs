//! Static text handlers and the route fallback

use crate::error::AppError;
use axum::extract::Path;

/// GET / - Static greeting
pub async fn hello_world() -> &'static str {
    "Hello World!"
}

/// GET /user/:username - Greeting for the named user
pub async fn greet_user(Path(username): Path<String>) -> String {
    format!("Hello, {}!", username)
}

/// Any unmatched path or method
pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}
