//! Domain service for workshop registrations.
//!
//! Seat accounting lives here: a registration reserves a seat when it is
//! submitted and gives it back when it is cancelled.

use crate::domain::{RegistrationId, RegistrationStatus, UserId, WorkshopId, WorkshopStatus};
use crate::models::{NewRegistration, Registration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Registration not found: {0}")]
    NotFound(RegistrationId),

    #[error("Workshop not found: {0}")]
    WorkshopNotFound(WorkshopId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Workshop {workshop_id} is {status} and not accepting registrations")]
    WorkshopClosed {
        workshop_id: WorkshopId,
        status: WorkshopStatus,
    },

    #[error("Workshop {workshop_id} is fully booked ({seats} seats)")]
    FullyBooked { workshop_id: WorkshopId, seats: i32 },

    #[error("User {user_id} already holds registration {registration_id}")]
    AlreadyRegistered {
        registration_id: RegistrationId,
        user_id: UserId,
        workshop_id: WorkshopId,
    },

    #[error("Cannot change registration status from {from} to {to}")]
    InvalidTransition {
        from: RegistrationStatus,
        to: RegistrationStatus,
    },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistrationError {
    /// Label used for the `registrations_rejected_total` metric.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::WorkshopNotFound(_) => "workshop_not_found",
            Self::UserNotFound(_) => "user_not_found",
            Self::WorkshopClosed { .. } => "workshop_closed",
            Self::FullyBooked { .. } => "fully_booked",
            Self::AlreadyRegistered { .. } => "duplicate",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Database(_) | Self::Internal(_) => "error",
        }
    }
}

impl From<sea_orm::DbErr> for RegistrationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RegistrationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait RegistrationService: Send + Sync {
    /// Submits a registration, reserving one seat of the workshop.
    ///
    /// Automated workshops confirm immediately; manual ones start pending.
    async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<Registration, RegistrationError>;

    async fn get(&self, id: RegistrationId) -> Result<Registration, RegistrationError>;

    /// Registrations of a user, oldest first. Unknown users yield an empty list.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Registration>, RegistrationError>;

    /// Registrations for a workshop, oldest first.
    async fn list_for_workshop(
        &self,
        workshop_id: WorkshopId,
    ) -> Result<Vec<Registration>, RegistrationError>;

    /// Moves a registration along its lifecycle. Cancelling releases the seat.
    async fn update_status(
        &self,
        id: RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Registration, RegistrationError>;
}
