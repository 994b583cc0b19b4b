use crate::db::now_timestamp;
use crate::domain::{
    RegistrationId, RegistrationMode, RegistrationStatus, UserId, WorkshopId, WorkshopStatus,
};
use crate::entities::{prelude::*, registrations, workshops};
use crate::models::NewRegistration;
use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// Result of a registration attempt. Every variant other than `Created`
/// leaves the database untouched.
#[derive(Debug)]
pub enum RegistrationOutcome {
    Created(registrations::Model),
    WorkshopNotFound,
    UserNotFound,
    WorkshopClosed(WorkshopStatus),
    FullyBooked { seats: i32 },
    AlreadyRegistered(RegistrationId),
}

#[derive(Debug)]
pub enum StatusChangeOutcome {
    Updated(registrations::Model),
    NotFound,
    InvalidTransition { from: RegistrationStatus },
}

pub struct RegistrationRepository {
    conn: DatabaseConnection,
}

impl RegistrationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Reserves a seat and inserts the registration in one transaction.
    ///
    /// The transaction opens with the guarded seat increment, so concurrent
    /// registrations for the same workshop queue on the write lock and the
    /// counter can never pass `seats`.
    pub async fn create(&self, registration: &NewRegistration) -> Result<RegistrationOutcome> {
        let workshop_id = registration.workshop_id.value();
        let user_id = registration.user_id.value();

        let txn = self.conn.begin().await?;

        let reserved = Workshops::update_many()
            .col_expr(
                workshops::Column::RegisteredSeats,
                Expr::col(workshops::Column::RegisteredSeats).add(1),
            )
            .filter(workshops::Column::Id.eq(workshop_id))
            .filter(workshops::Column::Status.eq(WorkshopStatus::Active.as_str()))
            .filter(
                Expr::col(workshops::Column::RegisteredSeats)
                    .lt(Expr::col(workshops::Column::Seats)),
            )
            .exec(&txn)
            .await
            .context("Failed to reserve workshop seat")?;

        if reserved.rows_affected == 0 {
            let outcome = Self::explain_rejected_reservation(&txn, registration.workshop_id).await?;
            txn.rollback().await?;
            return Ok(outcome);
        }

        let workshop = Workshops::find_by_id(workshop_id)
            .one(&txn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Workshop {workshop_id} vanished during registration"))?;

        if Users::find_by_id(user_id).one(&txn).await?.is_none() {
            txn.rollback().await?;
            return Ok(RegistrationOutcome::UserNotFound);
        }

        let existing = Registrations::find()
            .filter(registrations::Column::UserId.eq(user_id))
            .filter(registrations::Column::WorkshopId.eq(workshop_id))
            .filter(registrations::Column::Status.ne(RegistrationStatus::Cancelled.as_str()))
            .one(&txn)
            .await?;

        if let Some(existing) = existing {
            txn.rollback().await?;
            return Ok(RegistrationOutcome::AlreadyRegistered(RegistrationId::new(existing.id)));
        }

        let registration_mode: RegistrationMode = workshop.registration_mode.parse()?;

        let created = registrations::ActiveModel {
            user_id: Set(user_id),
            workshop_id: Set(workshop_id),
            status: Set(registration_mode.initial_status().as_str().to_string()),
            registered_at: Set(now_timestamp()),
            payment_screenshot: Set(registration.payment_screenshot.clone()),
            notes: Set(registration.notes.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert registration")?;

        txn.commit().await?;
        Ok(RegistrationOutcome::Created(created))
    }

    async fn explain_rejected_reservation(
        txn: &DatabaseTransaction,
        workshop_id: WorkshopId,
    ) -> Result<RegistrationOutcome> {
        let Some(workshop) = Workshops::find_by_id(workshop_id.value()).one(txn).await? else {
            return Ok(RegistrationOutcome::WorkshopNotFound);
        };

        let status: WorkshopStatus = workshop.status.parse()?;
        if status != WorkshopStatus::Active {
            return Ok(RegistrationOutcome::WorkshopClosed(status));
        }

        Ok(RegistrationOutcome::FullyBooked {
            seats: workshop.seats,
        })
    }

    pub async fn get(&self, id: RegistrationId) -> Result<Option<registrations::Model>> {
        Registrations::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query registration by ID")
    }

    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<registrations::Model>> {
        Registrations::find()
            .filter(registrations::Column::UserId.eq(user_id.value()))
            .order_by_asc(registrations::Column::RegisteredAt)
            .order_by_asc(registrations::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list registrations for user")
    }

    pub async fn list_for_workshop(
        &self,
        workshop_id: WorkshopId,
    ) -> Result<Vec<registrations::Model>> {
        Registrations::find()
            .filter(registrations::Column::WorkshopId.eq(workshop_id.value()))
            .order_by_asc(registrations::Column::RegisteredAt)
            .order_by_asc(registrations::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list registrations for workshop")
    }

    /// Moves a registration to `next` if its current status allows it.
    ///
    /// The status check is part of the UPDATE, and a cancellation releases the
    /// seat in the same transaction.
    pub async fn update_status(
        &self,
        id: RegistrationId,
        next: RegistrationStatus,
    ) -> Result<StatusChangeOutcome> {
        let allowed_from: Vec<&str> = next
            .allowed_predecessors()
            .iter()
            .map(RegistrationStatus::as_str)
            .collect();

        let txn = self.conn.begin().await?;

        let changed = if allowed_from.is_empty() {
            0
        } else {
            Registrations::update_many()
                .col_expr(registrations::Column::Status, Expr::value(next.as_str()))
                .filter(registrations::Column::Id.eq(id.value()))
                .filter(registrations::Column::Status.is_in(allowed_from))
                .exec(&txn)
                .await
                .context("Failed to update registration status")?
                .rows_affected
        };

        let current = Registrations::find_by_id(id.value()).one(&txn).await?;

        let Some(current) = current else {
            txn.rollback().await?;
            return Ok(StatusChangeOutcome::NotFound);
        };

        if changed == 0 {
            txn.rollback().await?;
            return Ok(StatusChangeOutcome::InvalidTransition {
                from: current.status.parse()?,
            });
        }

        if !next.holds_seat() {
            Workshops::update_many()
                .col_expr(
                    workshops::Column::RegisteredSeats,
                    Expr::col(workshops::Column::RegisteredSeats).sub(1),
                )
                .filter(workshops::Column::Id.eq(current.workshop_id))
                .filter(workshops::Column::RegisteredSeats.gt(0))
                .exec(&txn)
                .await
                .context("Failed to release workshop seat")?;
        }

        txn.commit().await?;
        Ok(StatusChangeOutcome::Updated(current))
    }
}
