//! System status endpoint.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,

    /// Seconds since the server started.
    pub uptime: u64,

    /// `"ok"` when the database answers a ping, `"unavailable"` otherwise.
    pub database: &'static str,
}

/// `GET /api/system/status`
///
/// Always answers 200 so a failing database is visible in the body rather
/// than as a transport error.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    let database = match state.store().ping().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            "unavailable"
        }
    };

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.start_time.elapsed().as_secs(),
        database,
    })
}
