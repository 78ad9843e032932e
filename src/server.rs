//! HTTP front end: a single `GET` endpoint answering similarity queries.
//!
//! ```text
//! curl "http://localhost:5555/?hash=T1DB52C083FA3DF4C75D587A74009B8EA3065B9E4E266D8F9C4FB974091736CE2E401A4A&radius=5"
//! ```
//!
//! `radius` (or its alias `count`) is the number of neighbors to return,
//! 10 by default. The response is a JSON array of matches, nearest first.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::config::{DEFAULT_COUNT, SHUTDOWN_GRACE_SECS};
use crate::error::{Error, Result};
use crate::output::find_matches;
use crate::SampleTree;

/// Errors returned to HTTP clients as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request parameters (400).
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Shared, read-only handler state. The tree is never mutated after it
/// is loaded, so handlers search it without locking.
#[derive(Clone)]
pub struct AppState {
    pub tree: Arc<SampleTree>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub hash: Option<String>,
    #[serde(alias = "count")]
    pub radius: Option<String>,
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>)
                -> std::result::Result<Response, ApiError> {
    let hash = params.hash
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing hash".to_string()))?;

    let count = match params.radius.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_COUNT,
        Some(r) => r.parse::<u16>()
            .map_err(|e| ApiError::BadRequest(format!("invalid radius {:?}: {}", r, e)))?,
    };

    let matches = find_matches(&state.tree, &hash, usize::from(count))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    tracing::debug!(hash = %hash.trim(), count, found = matches.len(), "answered query");
    Ok(Json(matches).into_response())
}

fn route_path(base_path: &str) -> String {
    let trimmed = base_path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Build the router serving `tree` at `base_path`.
pub fn router(tree: Arc<SampleTree>, base_path: &str) -> Router {
    Router::new()
        .route(&route_path(base_path), get(search))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { tree })
}

/// Where and how to listen.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub listen: String,
    pub base_path: String,
    pub tls_cert: Option<PathBuf>,
    pub tls_key: Option<PathBuf>,
}

impl ServeConfig {
    /// Check the listen address and TLS settings without binding anything.
    pub fn validate(&self) -> Result<SocketAddr> {
        if self.tls_cert.is_some() != self.tls_key.is_some() {
            return Err(Error::Config(
                "both --tls-cert and --tls-key must be provided together".to_string()));
        }
        self.listen.parse()
            .map_err(|e| Error::Config(format!("invalid listen address {:?}: {}", self.listen, e)))
    }
}

/// Serve queries against `tree` until Ctrl+C or SIGTERM.
pub async fn serve(tree: Arc<SampleTree>, config: &ServeConfig) -> Result<()> {
    let addr = config.validate()?;
    let app = router(tree, &config.base_path);

    match (&config.tls_cert, &config.tls_key) {
        (Some(cert), Some(key)) => {
            let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert, key).await?;
            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();
            tokio::spawn(async move {
                wait_for_signal().await;
                shutdown_handle.graceful_shutdown(Some(Duration::from_secs(SHUTDOWN_GRACE_SECS)));
            });
            tracing::info!(%addr, base_path = %config.base_path, "listening (TLS)");
            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, base_path = %config.base_path, "listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(wait_for_signal())
                .await?;
        }
    }
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down");
}
