//! Main HTTP server for the analysis service.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use fraudscreen_config::ScreenConfig;

use crate::analyze::{analyze_document, method_not_allowed, not_found};
use crate::health_api::get_health;
use crate::service::AnalysisService;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub service: Arc<AnalysisService>,
    pub max_body_bytes: usize,
}

impl GatewayState {
    pub fn from_config(config: &ScreenConfig) -> Self {
        Self {
            service: Arc::new(AnalysisService::from_config(&config.model)),
            max_body_bytes: config.server.max_body_bytes,
        }
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

/// Bare `OPTIONS` without preflight headers still gets a 200.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub fn build_router(state: GatewayState) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route(
            "/analyze-document",
            post(analyze_document)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/functions/v1/analyze-document",
            post(analyze_document)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/api/health", get(get_health).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Analysis server terminated")?;
    Ok(())
}

/// Bind `addr` and serve until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        "Analysis service listening on {} (model configured: {})",
        addr,
        state.service.is_configured()
    );
    serve(listener, state, shutdown_signal()).await?;
    info!("Analysis service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
