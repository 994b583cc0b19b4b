//! `SeaORM` implementation of the `RegistrationService` trait.

use crate::db::{RegistrationOutcome, StatusChangeOutcome, Store};
use crate::domain::events::NotificationEvent;
use crate::domain::{RegistrationId, RegistrationStatus, UserId, WorkshopId};
use crate::models::{NewRegistration, Registration};
use crate::services::registration_service::{RegistrationError, RegistrationService};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{info, warn};

pub struct SeaOrmRegistrationService {
    store: Store,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmRegistrationService {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<NotificationEvent>) -> Self {
        Self { store, event_bus }
    }

    fn record_rejection(err: &RegistrationError) {
        metrics::counter!("registrations_rejected_total", "reason" => err.reason()).increment(1);
    }

    fn convert_all(
        rows: Vec<crate::entities::registrations::Model>,
    ) -> Result<Vec<Registration>, RegistrationError> {
        rows.into_iter()
            .map(|row| Registration::try_from(row).map_err(RegistrationError::from))
            .collect()
    }
}

#[async_trait]
impl RegistrationService for SeaOrmRegistrationService {
    async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<Registration, RegistrationError> {
        let workshop_id = registration.workshop_id;
        let user_id = registration.user_id;

        let rejection = match self.store.create_registration(&registration).await? {
            RegistrationOutcome::Created(row) => {
                let created = Registration::try_from(row)?;

                metrics::counter!("registrations_created_total").increment(1);
                info!(
                    registration_id = %created.id,
                    workshop_id = %workshop_id,
                    user_id = %user_id,
                    status = %created.status,
                    "Registration created"
                );
                let _ = self.event_bus.send(NotificationEvent::RegistrationCreated {
                    registration_id: created.id,
                    workshop_id,
                    user_id,
                    status: created.status,
                });

                return Ok(created);
            }
            RegistrationOutcome::WorkshopNotFound => {
                RegistrationError::WorkshopNotFound(workshop_id)
            }
            RegistrationOutcome::UserNotFound => RegistrationError::UserNotFound(user_id),
            RegistrationOutcome::WorkshopClosed(status) => RegistrationError::WorkshopClosed {
                workshop_id,
                status,
            },
            RegistrationOutcome::FullyBooked { seats } => {
                RegistrationError::FullyBooked { workshop_id, seats }
            }
            RegistrationOutcome::AlreadyRegistered(registration_id) => {
                RegistrationError::AlreadyRegistered {
                    registration_id,
                    user_id,
                    workshop_id,
                }
            }
        };

        Self::record_rejection(&rejection);
        warn!(
            workshop_id = %workshop_id,
            user_id = %user_id,
            reason = rejection.reason(),
            "Registration rejected"
        );
        Err(rejection)
    }

    async fn get(&self, id: RegistrationId) -> Result<Registration, RegistrationError> {
        let row = self
            .store
            .get_registration(id)
            .await?
            .ok_or(RegistrationError::NotFound(id))?;

        Ok(Registration::try_from(row)?)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Registration>, RegistrationError> {
        Self::convert_all(self.store.list_registrations_for_user(user_id).await?)
    }

    async fn list_for_workshop(
        &self,
        workshop_id: WorkshopId,
    ) -> Result<Vec<Registration>, RegistrationError> {
        let rows = self
            .store
            .list_registrations_for_workshop(workshop_id)
            .await?;
        Self::convert_all(rows)
    }

    async fn update_status(
        &self,
        id: RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Registration, RegistrationError> {
        let updated = match self.store.update_registration_status(id, status).await? {
            StatusChangeOutcome::Updated(row) => Registration::try_from(row)?,
            StatusChangeOutcome::NotFound => return Err(RegistrationError::NotFound(id)),
            StatusChangeOutcome::InvalidTransition { from } => {
                return Err(RegistrationError::InvalidTransition { from, to: status });
            }
        };

        info!(
            registration_id = %id,
            workshop_id = %updated.workshop_id,
            status = %updated.status,
            "Registration status changed"
        );
        let _ = self
            .event_bus
            .send(NotificationEvent::RegistrationStatusChanged {
                registration_id: id,
                workshop_id: updated.workshop_id,
                user_id: updated.user_id,
                status: updated.status,
            });

        Ok(updated)
    }
}
