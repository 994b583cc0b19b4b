//! `SeaORM` implementation of the `WorkshopService` trait.

use crate::db::{Store, WorkshopUpdateOutcome};
use crate::domain::WorkshopId;
use crate::domain::events::NotificationEvent;
use crate::models::{NewWorkshop, Workshop, WorkshopChanges, WorkshopFilter};
use crate::services::workshop_service::{WorkshopError, WorkshopService};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

pub struct SeaOrmWorkshopService {
    store: Store,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmWorkshopService {
    #[must_use]
    pub const fn new(store: Store, event_bus: broadcast::Sender<NotificationEvent>) -> Self {
        Self { store, event_bus }
    }
}

#[async_trait]
impl WorkshopService for SeaOrmWorkshopService {
    async fn list(&self, filter: WorkshopFilter) -> Result<Vec<Workshop>, WorkshopError> {
        let rows = self.store.list_workshops(&filter).await?;

        rows.into_iter()
            .map(|row| Workshop::try_from(row).map_err(WorkshopError::from))
            .collect()
    }

    async fn get(&self, id: WorkshopId) -> Result<Workshop, WorkshopError> {
        let row = self
            .store
            .get_workshop(id)
            .await?
            .ok_or(WorkshopError::NotFound(id))?;

        Ok(Workshop::try_from(row)?)
    }

    async fn create(&self, workshop: NewWorkshop) -> Result<Workshop, WorkshopError> {
        let row = self.store.create_workshop(&workshop).await?;
        let created = Workshop::try_from(row)?;

        info!(workshop_id = %created.id, title = %created.title, "Workshop created");
        let _ = self.event_bus.send(NotificationEvent::WorkshopCreated {
            workshop_id: created.id,
            title: created.title.clone(),
        });

        Ok(created)
    }

    async fn update(
        &self,
        id: WorkshopId,
        changes: WorkshopChanges,
    ) -> Result<Workshop, WorkshopError> {
        let updated = match self.store.update_workshop(id, &changes).await? {
            WorkshopUpdateOutcome::Updated(row) => Workshop::try_from(row)?,
            WorkshopUpdateOutcome::NotFound => return Err(WorkshopError::NotFound(id)),
            WorkshopUpdateOutcome::SeatsBelowRegistered { registered } => {
                return Err(WorkshopError::SeatsBelowRegistered {
                    requested: changes.seats.unwrap_or_default(),
                    registered,
                });
            }
        };

        let _ = self.event_bus.send(NotificationEvent::WorkshopUpdated {
            workshop_id: updated.id,
            title: updated.title.clone(),
        });

        Ok(updated)
    }

    async fn delete(&self, id: WorkshopId) -> Result<(), WorkshopError> {
        if !self.store.delete_workshop(id).await? {
            return Err(WorkshopError::NotFound(id));
        }

        info!(workshop_id = %id, "Workshop deleted");
        let _ = self
            .event_bus
            .send(NotificationEvent::WorkshopDeleted { workshop_id: id });

        Ok(())
    }
}
