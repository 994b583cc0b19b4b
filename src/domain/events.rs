//! Change notifications broadcast after successful mutations.
//!
//! Clients subscribe through the SSE endpoint and invalidate the cached
//! queries named by each event.

use serde::Serialize;

use super::{RegistrationId, RegistrationStatus, UserId, WorkshopId};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all_fields = "camelCase")]
pub enum NotificationEvent {
    WorkshopCreated {
        workshop_id: WorkshopId,
        title: String,
    },
    WorkshopUpdated {
        workshop_id: WorkshopId,
        title: String,
    },
    WorkshopDeleted {
        workshop_id: WorkshopId,
    },

    RegistrationCreated {
        registration_id: RegistrationId,
        workshop_id: WorkshopId,
        user_id: UserId,
        status: RegistrationStatus,
    },
    RegistrationStatusChanged {
        registration_id: RegistrationId,
        workshop_id: WorkshopId,
        user_id: UserId,
        status: RegistrationStatus,
    },

    UserCreated {
        user_id: UserId,
    },
    UserUpdated {
        user_id: UserId,
    },
    UserDeleted {
        user_id: UserId,
    },
}

impl NotificationEvent {
    /// Query keys a client should invalidate when it sees this event.
    #[must_use]
    pub fn invalidates(&self) -> Vec<String> {
        match self {
            Self::WorkshopCreated { .. } => vec!["/api/workshops".to_string()],
            Self::WorkshopUpdated { workshop_id, .. } | Self::WorkshopDeleted { workshop_id } => {
                vec![
                    "/api/workshops".to_string(),
                    format!("/api/workshops/{workshop_id}"),
                ]
            }
            Self::RegistrationCreated {
                workshop_id,
                user_id,
                ..
            }
            | Self::RegistrationStatusChanged {
                workshop_id,
                user_id,
                ..
            } => vec![
                "/api/workshops".to_string(),
                format!("/api/workshops/{workshop_id}"),
                format!("/api/registrations/user/{user_id}"),
                format!("/api/registrations/workshop/{workshop_id}"),
            ],
            Self::UserCreated { .. } => vec!["/api/users".to_string()],
            Self::UserUpdated { user_id } | Self::UserDeleted { user_id } => vec![
                "/api/users".to_string(),
                format!("/api/users/{user_id}"),
            ],
        }
    }
}
