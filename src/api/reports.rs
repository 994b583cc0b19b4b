use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::services::Overview;

/// `GET /api/reports/overview`
pub async fn get_overview(State(state): State<Arc<AppState>>) -> Result<Json<Overview>, ApiError> {
    Ok(Json(state.report_service().overview().await?))
}
