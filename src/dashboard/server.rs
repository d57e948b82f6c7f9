use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{info, warn};
use serde_json::json;

use super::view::DashboardView;
use crate::client::{HistoryQuery, PositionSource};
use crate::errors::{Error, Result};

#[derive(Clone)]
struct AppState {
    source: Arc<dyn PositionSource>,
    query: HistoryQuery,
}

/// JSON routes: `/api/positions` (raw page) and `/api/dashboard` (view)
pub fn router(source: Arc<dyn PositionSource>, query: HistoryQuery) -> Router {
    Router::new()
        .route("/api/positions", get(positions_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .with_state(AppState { source, query })
}

/// Start the dashboard server
pub async fn start_server(
    source: Arc<dyn PositionSource>,
    query: HistoryQuery,
    host: &str,
    port: u16,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| Error::Config(format!("Invalid server address {}:{}: {}", host, port, e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Dashboard server running on http://{}", addr);

    axum::serve(listener, router(source, query)).await?;
    Ok(())
}

fn error_response(err: Error) -> Response {
    warn!("Dashboard fetch failed: {}", err);
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

async fn positions_handler(State(state): State<AppState>) -> Response {
    match state.source.positions_history(&state.query).await {
        Ok(positions) => Json(positions).into_response(),
        Err(e) => error_response(e),
    }
}

async fn dashboard_handler(State(state): State<AppState>) -> Response {
    match state.source.positions_history(&state.query).await {
        Ok(positions) => Json(DashboardView::from_positions(&positions)).into_response(),
        Err(e) => error_response(e),
    }
}
