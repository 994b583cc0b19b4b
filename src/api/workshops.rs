use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::extract::{PathParam, Payload};
use super::{ApiError, AppState, CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopListQuery};
use crate::domain::WorkshopId;
use crate::models::Workshop;

/// `GET /api/workshops`, newest first.
pub async fn list_workshops(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WorkshopListQuery>,
) -> Result<Json<Vec<Workshop>>, ApiError> {
    let filter = query.validate()?;
    let workshops = state.workshop_service().list(filter).await?;
    Ok(Json(workshops))
}

pub async fn get_workshop(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<WorkshopId>,
) -> Result<Json<Workshop>, ApiError> {
    Ok(Json(state.workshop_service().get(id).await?))
}

pub async fn create_workshop(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<CreateWorkshopRequest>,
) -> Result<(StatusCode, Json<Workshop>), ApiError> {
    let workshop = request.validate()?;
    let created = state.workshop_service().create(workshop).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/workshops/{id}` with any subset of the workshop fields.
pub async fn update_workshop(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<WorkshopId>,
    Payload(request): Payload<UpdateWorkshopRequest>,
) -> Result<Json<Workshop>, ApiError> {
    let changes = request.validate()?;
    Ok(Json(state.workshop_service().update(id, changes).await?))
}

pub async fn delete_workshop(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<WorkshopId>,
) -> Result<StatusCode, ApiError> {
    state.workshop_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
