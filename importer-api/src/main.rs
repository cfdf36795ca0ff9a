//! XML Content Importer API server
//!
//! HTTP surface over the import pipeline: accepts an uploaded feed
//! document, runs the import, and returns the report.

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use importer_media::HttpImageSource;
use importer_services::{Importer, ImporterConfig, SqliteContentStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub importer: Arc<Importer>,
    /// Uploads must present this bearer token when set
    pub api_token: Option<String>,
}

/// Uploaded feeds larger than this are rejected
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,importer_api=debug")),
        )
        .init();

    info!("Starting XML Content Importer API");

    // Initialize the content store (SQLite + media directory)
    let db_path =
        std::env::var("IMPORTER_DB_PATH").unwrap_or_else(|_| "data/content.db".to_string());
    let media_dir =
        std::env::var("IMPORTER_MEDIA_DIR").unwrap_or_else(|_| "data/media".to_string());
    info!(
        "Initializing content store at: {} (media in {})",
        db_path, media_dir
    );
    let store = Arc::new(
        SqliteContentStore::new(&db_path, media_dir.as_str())
            .expect("Failed to initialize content store"),
    );

    // Network collaborator for image downloads
    let images = Arc::new(HttpImageSource::new());

    let author = std::env::var("IMPORTER_AUTHOR").unwrap_or_else(|_| "importer".to_string());
    let importer = Arc::new(Importer::new(
        store,
        images,
        ImporterConfig {
            author,
            ..ImporterConfig::default()
        },
    ));

    let api_token = std::env::var("IMPORTER_API_TOKEN").ok();
    if api_token.is_none() {
        warn!("IMPORTER_API_TOKEN not set - import endpoint is unauthenticated");
    }

    let state = AppState {
        importer,
        api_token,
    };

    // Configure CORS for admin frontends
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Build router
    let app = Router::new()
        .nest("/api", routes::api_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
