//! REST API for the computed charging plan.
//!
//! Provides two GET endpoints:
//! - `/plan`: schedule, daily average, profitability and command
//! - `/prices`: hourly records with optional range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::runner::DayPlan;

pub use types::{ErrorResponse, PlanResponse, PriceQuery};

/// Immutable application state shared across all request handlers.
///
/// Built once after the planning run and wrapped in `Arc`; handlers only
/// read from it.
pub struct AppState {
    /// Plan computed for the day.
    pub plan: DayPlan,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/plan", get(handlers::get_plan))
        .route("/prices", get(handlers::get_prices))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
