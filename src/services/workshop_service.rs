//! Domain service for workshop listings.
//!
//! Inputs arrive already validated (see `api::validation`); this layer owns
//! the rules that need the database, such as never shrinking capacity below
//! the seats already taken.

use crate::domain::WorkshopId;
use crate::models::{NewWorkshop, Workshop, WorkshopChanges, WorkshopFilter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkshopError {
    #[error("Workshop not found: {0}")]
    NotFound(WorkshopId),

    #[error("Cannot reduce seats to {requested}: {registered} already registered")]
    SeatsBelowRegistered { requested: i32, registered: i32 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for WorkshopError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for WorkshopError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait WorkshopService: Send + Sync {
    /// Lists workshops, newest first.
    async fn list(&self, filter: WorkshopFilter) -> Result<Vec<Workshop>, WorkshopError>;

    async fn get(&self, id: WorkshopId) -> Result<Workshop, WorkshopError>;

    async fn create(&self, workshop: NewWorkshop) -> Result<Workshop, WorkshopError>;

    /// Applies a partial update. Only supplied fields change.
    async fn update(
        &self,
        id: WorkshopId,
        changes: WorkshopChanges,
    ) -> Result<Workshop, WorkshopError>;

    /// Deletes a workshop and its registrations.
    async fn delete(&self, id: WorkshopId) -> Result<(), WorkshopError>;
}
