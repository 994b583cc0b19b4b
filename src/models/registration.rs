use serde::Serialize;

use crate::domain::{RegistrationId, RegistrationStatus, UserId, WorkshopId};
use crate::entities::registrations;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    pub user_id: UserId,
    pub workshop_id: WorkshopId,
    pub status: RegistrationStatus,
    pub registered_at: String,
    pub payment_screenshot: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<registrations::Model> for Registration {
    type Error = anyhow::Error;

    fn try_from(model: registrations::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RegistrationId::new(model.id),
            user_id: UserId::new(model.user_id),
            workshop_id: WorkshopId::new(model.workshop_id),
            status: model.status.parse()?,
            registered_at: model.registered_at,
            payment_screenshot: model.payment_screenshot,
            notes: model.notes,
        })
    }
}

/// A registration request. The initial status is chosen from the target
/// workshop's registration mode, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub user_id: UserId,
    pub workshop_id: WorkshopId,
    pub payment_screenshot: Option<String>,
    pub notes: Option<String>,
}
