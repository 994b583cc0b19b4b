use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::extract::{PathParam, Payload};
use super::{ApiError, AppState, CreateUserRequest, UpdateUserRequest, UserListQuery};
use crate::domain::UserId;
use crate::models::User;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let filter = query.validate()?;
    Ok(Json(state.user_service().list(filter).await?))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<UserId>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service().get(id).await?))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Payload(request): Payload<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = request.validate()?;
    let created = state.user_service().create(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<UserId>,
    Payload(request): Payload<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let changes = request.validate()?;
    Ok(Json(state.user_service().update(id, changes).await?))
}

/// `DELETE /api/users/{id}`. Registrations of the user go with it.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<UserId>,
) -> Result<StatusCode, ApiError> {
    state.user_service().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
