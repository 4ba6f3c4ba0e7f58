//! Read-only REST API over a finished sizing run.
//!
//! Provides two GET endpoints:
//! - `/result`: capacities, cost, KPIs and the options used
//! - `/dispatch`: hourly dispatch trace with optional range filtering

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::options::{Options, SolverConfig};
use crate::sizing::OptimizationResult;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the sizing run completes and wrapped in
/// `Arc`; all data is read-only.
pub struct AppState {
    /// Options the run was sized with.
    pub options: Options,
    /// Solver hyperparameters used.
    pub solver: SolverConfig,
    /// The finished run.
    pub result: OptimizationResult,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/result", get(handlers::get_result))
        .route("/dispatch", get(handlers::get_dispatch))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
