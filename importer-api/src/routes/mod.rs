//! API route definitions

mod health;
mod import;

use axum::Router;

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(import::routes())
        .merge(health::routes())
}
