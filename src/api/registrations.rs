use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::extract::{PathParam, Payload};
use super::{ApiError, AppState, CreateRegistrationRequest, UpdateRegistrationStatusRequest};
use crate::domain::{RegistrationId, UserId, WorkshopId};
use crate::models::Registration;

/// `POST /api/registrations`
///
/// Reserves a seat. Returns 409 when the workshop is full, closed, or the
/// user already holds a live registration for it.
pub async fn create_registration(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<Registration>), ApiError> {
    let registration = request.validate()?;
    let created = state.registration_service().register(registration).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_registration(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<RegistrationId>,
) -> Result<Json<Registration>, ApiError> {
    Ok(Json(state.registration_service().get(id).await?))
}

pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    PathParam(user_id): PathParam<UserId>,
) -> Result<Json<Vec<Registration>>, ApiError> {
    let registrations = state.registration_service().list_for_user(user_id).await?;
    Ok(Json(registrations))
}

pub async fn list_for_workshop(
    State(state): State<Arc<AppState>>,
    PathParam(workshop_id): PathParam<WorkshopId>,
) -> Result<Json<Vec<Registration>>, ApiError> {
    let registrations = state
        .registration_service()
        .list_for_workshop(workshop_id)
        .await?;
    Ok(Json(registrations))
}

/// `PUT /api/registrations/{id}/status`
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<RegistrationId>,
    Payload(request): Payload<UpdateRegistrationStatusRequest>,
) -> Result<Json<Registration>, ApiError> {
    let status = request.validate()?;
    let updated = state
        .registration_service()
        .update_status(id, status)
        .await?;
    Ok(Json(updated))
}
