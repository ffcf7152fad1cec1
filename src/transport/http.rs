//! HTTP server for the verification API

use crate::verdict::{ClassificationRequest, Verdict, VerdictService};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state
struct AppState {
    verdicts: VerdictService,
}

/// Liveness payload for `GET /`
#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    provider: String,
    model: String,
}

/// Build the router; exposed separately so tests can drive it without a socket
pub fn router(verdicts: VerdictService) -> Router {
    let state = Arc::new(AppState { verdicts });

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/verify", post(verify_intent))
        // The caller is a browser extension on its own origin
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run_http_server(addr: SocketAddr, verdicts: VerdictService) -> Result<()> {
    let app = router(verdicts);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}

async fn home() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Brain is Online",
    })
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let provider = state.verdicts.provider();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: format!(
            "{}+{}",
            env!("CARGO_PKG_VERSION"),
            env!("SENTRIFOCUS_GIT_HASH")
        ),
        provider: provider.name().to_string(),
        model: provider.model().to_string(),
    })
}

/// Classifier failures come back as 200 with an `error` field, never as an
/// error status, so the extension never treats an outage as a block.
async fn verify_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassificationRequest>,
) -> Json<Verdict> {
    Json(state.verdicts.verify(&req).await)
}
