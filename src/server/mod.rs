//! Axum HTTP channel for the BFHL API.
//!
//! ## URL layout
//!
//! ```text
//! POST /bfhl     → classify a token list
//! GET  /bfhl     → static description (feature `docs-route`)
//! GET  /         → liveness message
//! GET  /health   → {"status": "healthy"}
//! ```
//!
//! [`HttpServer::run`] drives `axum::serve` until the shared
//! [`CancellationToken`] is cancelled, then drains in-flight requests.

mod api;
#[cfg(feature = "docs-route")]
mod docs;

pub use api::{BfhlRequest, BfhlResponse};

use std::any::Any;
use std::sync::Arc;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::{Config, IdentityConfig};
use crate::error::{ApiError, AppError};

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Built once at startup and never mutated.
#[derive(Clone)]
pub struct ApiState {
    pub identity: Arc<IdentityConfig>,
}

impl ApiState {
    pub fn new(identity: IdentityConfig) -> Self {
        Self { identity: Arc::new(identity) }
    }
}

// ── HttpServer ────────────────────────────────────────────────────────────────

pub struct HttpServer {
    bind_addr: String,
    cors: bool,
    state: ApiState,
}

impl HttpServer {
    pub fn new(config: &Config) -> Self {
        Self {
            bind_addr: config.server.bind.clone(),
            cors: config.server.cors,
            state: ApiState::new(config.identity.clone()),
        }
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.cors)
    }

    /// Bind and serve until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), AppError> {
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|e| AppError::Server(format!("bind failed on {}: {e}", self.bind_addr)))?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener. Tests bind port 0 and pass it in.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<(), AppError> {
        let local_addr = listener.local_addr()?;
        info!(%local_addr, cors = self.cors, "http server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| AppError::Server(format!("axum server error: {e}")))?;

        info!(%local_addr, "http server shut down");
        Ok(())
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Full application router with middleware applied.
pub fn build_router(state: ApiState, cors: bool) -> Router {
    with_layers(routes().with_state(state), cors)
}

fn routes() -> Router<ApiState> {
    let bfhl = axum::routing::post(api::bfhl);
    #[cfg(feature = "docs-route")]
    let bfhl = bfhl.get(docs::describe);

    Router::new()
        .route("/bfhl",   bfhl)
        .route("/",       get(api::root))
        .route("/health", get(api::health))
}

/// Apply panic capture, request tracing and (optionally) CORS that mirrors the
/// caller's origin, method and headers and allows credentials.
pub fn with_layers(router: Router, cors: bool) -> Router {
    let router = router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::very_permissive())
    } else {
        router
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };
    error!(%detail, "request handler panicked");
    ApiError::Internal(detail).into_response()
}
