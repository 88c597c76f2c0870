//! Web front end.
//!
//! An axum app serving the upload page and the JSON endpoints it calls:
//!
//! | Route | |
//! |-------|-|
//! | `GET /` | upload page |
//! | `POST /upload` | multipart `excel_file` (+ `newsletter_date`) → generated newsletter |
//! | `GET /download/{filename}` | newsletter zipped |
//! | `GET /preview/{filename}` | newsletter HTML |
//! | `GET /history` | generated newsletters, newest first |
//! | `GET /health` | liveness, never gated |
//!
//! Every route but `/health` sits behind the basic-auth gate when
//! `auth.enabled` is set.

mod auth;
mod handlers;
mod page;

pub use handlers::{ApiError, HistoryEntry, HistoryResponse, UploadResponse};

use crate::config::{AppConfig, ServerConfig};
use crate::render::Renderer;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use std::fs;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot listen on {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
}

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let renderer = Renderer::from_config(&config);
        Self {
            config: Arc::new(config),
            renderer: Arc::new(renderer),
        }
    }
}

/// Build the application router.
pub fn build_router(config: AppConfig) -> Router {
    let state = AppState::new(config);
    let body_limit = state.config.server.max_upload_bytes();

    let gated = Router::new()
        .route("/", get(handlers::index))
        .route("/upload", post(handlers::upload))
        .route("/download/{filename}", get(handlers::download))
        .route("/preview/{filename}", get(handlers::preview))
        .route("/history", get(handlers::history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .merge(gated)
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the working directories, bind, and serve until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<(), ServerError> {
    fs::create_dir_all(&config.server.output_dir)?;
    fs::create_dir_all(&config.server.upload_dir)?;

    if config.auth.enabled {
        tracing::info!(username = %config.auth.username, "basic auth enabled");
    } else {
        tracing::warn!("basic auth disabled, every route is public");
    }

    let listener = bind(&config.server).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    let app = build_router(config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

/// Bind `host:port`. Host names are resolved, so `localhost` works as well
/// as literal addresses.
pub async fn bind(server: &ServerConfig) -> Result<TcpListener, ServerError> {
    TcpListener::bind((server.host.as_str(), server.port))
        .await
        .map_err(|source| ServerError::Bind {
            address: format!("{}:{}", server.host, server.port),
            source,
        })
}

/// Resolve when `signal` fires. A signal that cannot be registered never
/// resolves, so the server keeps running instead of stopping at once.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
}
