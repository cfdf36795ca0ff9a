//! Feed import endpoint
//!
//! Upload surface over the core pipeline. Authorization (a bearer token
//! check) happens before the importer is invoked; a fatal parse failure
//! maps to an error response, per-item failures come back inside the
//! report.

use std::io::Write;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use serde_json::json;
use tempfile::NamedTempFile;
use tracing::{error, info};

use crate::AppState;

/// Create import routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/import", post(import_feed))
}

/// POST /api/import - upload a feed document and run the import
async fn import_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    if let Some(expected) = &state.api_token {
        if !bearer_token_matches(&headers, expected) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "missing or invalid API token" })),
            )
                .into_response();
        }
    }

    // Pull the uploaded file out of the multipart body.
    let payload = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => match field.bytes().await {
                Ok(bytes) => break Some(bytes),
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": format!("failed to read upload: {}", e) })),
                    )
                        .into_response();
                }
            },
            Ok(Some(_)) => continue,
            Ok(None) => break None,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("invalid multipart body: {}", e) })),
                )
                    .into_response();
            }
        }
    };

    let Some(payload) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing 'file' field" })),
        )
            .into_response();
    };

    // Spool the upload to a temp file; the importer reads from a path.
    let mut spool = match NamedTempFile::new() {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create spool file: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "failed to spool upload" })),
            )
                .into_response();
        }
    };
    if let Err(e) = spool.write_all(&payload) {
        error!("Failed to write spool file: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "failed to spool upload" })),
        )
            .into_response();
    }

    match state.importer.import(spool.path()).await {
        Ok(report) => {
            info!(
                "Import complete: {} items processed, {} errors",
                report.items_processed,
                report.errors.len()
            );
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

fn bearer_token_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token == expected)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn accepts_matching_bearer_token() {
        let headers = headers_with_auth("Bearer sekrit");
        assert!(bearer_token_matches(&headers, "sekrit"));
    }

    #[test]
    fn rejects_wrong_or_malformed_tokens() {
        assert!(!bearer_token_matches(&headers_with_auth("Bearer nope"), "sekrit"));
        assert!(!bearer_token_matches(&headers_with_auth("sekrit"), "sekrit"));
        assert!(!bearer_token_matches(&HeaderMap::new(), "sekrit"));
    }
}
