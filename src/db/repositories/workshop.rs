use crate::db::now_timestamp;
use crate::db::repositories::contains_pattern;
use crate::domain::WorkshopId;
use crate::entities::{prelude::*, registrations, workshops};
use crate::models::workshop::DATE_FORMAT;
use crate::models::{NewWorkshop, WorkshopChanges, WorkshopFilter};
use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// Result of a partial workshop update.
#[derive(Debug)]
pub enum WorkshopUpdateOutcome {
    Updated(workshops::Model),
    NotFound,
    /// The requested capacity is below the seats already taken.
    SeatsBelowRegistered { registered: i32 },
}

pub struct WorkshopRepository {
    conn: DatabaseConnection,
}

impl WorkshopRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, filter: &WorkshopFilter) -> Result<Vec<workshops::Model>> {
        let mut query = Workshops::find();

        let search = filter.search.as_deref().map(str::trim);
        if let Some(term) = search.filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(workshops::Column::Title.like(contains_pattern(term)))
                    .add(workshops::Column::Company.like(contains_pattern(term))),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(workshops::Column::Status.eq(status.as_str()));
        }
        if let Some(mode) = filter.mode {
            query = query.filter(workshops::Column::Mode.eq(mode.as_str()));
        }

        query
            .order_by_desc(workshops::Column::CreatedAt)
            .order_by_desc(workshops::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list workshops")
    }

    pub async fn get(&self, id: WorkshopId) -> Result<Option<workshops::Model>> {
        Workshops::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query workshop by ID")
    }

    pub async fn create(&self, workshop: &NewWorkshop) -> Result<workshops::Model> {
        let now = now_timestamp();

        let active = workshops::ActiveModel {
            title: Set(workshop.title.clone()),
            description: Set(workshop.description.clone()),
            company: Set(workshop.company.clone()),
            date: Set(workshop.date.format(DATE_FORMAT).to_string()),
            time: Set(workshop.time.clone()),
            mode: Set(workshop.mode.as_str().to_string()),
            location: Set(workshop.location.clone()),
            price_cents: Set(workshop.price.cents()),
            seats: Set(workshop.seats),
            registered_seats: Set(0),
            registration_mode: Set(workshop.registration_mode.as_str().to_string()),
            image: Set(workshop.image.clone()),
            status: Set(workshop.status.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert workshop")
    }

    /// Applies only the supplied fields and bumps `updated_at`.
    ///
    /// A new capacity is written only if it still covers `registered_seats`;
    /// the check and the write are a single conditional UPDATE.
    pub async fn update(
        &self,
        id: WorkshopId,
        changes: &WorkshopChanges,
    ) -> Result<WorkshopUpdateOutcome> {
        let txn = self.conn.begin().await?;

        let mut query = Workshops::update_many()
            .col_expr(workshops::Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(workshops::Column::Id.eq(id.value()));

        if let Some(title) = &changes.title {
            query = query.col_expr(workshops::Column::Title, Expr::value(title.clone()));
        }
        if let Some(description) = &changes.description {
            query = query.col_expr(
                workshops::Column::Description,
                Expr::value(description.clone()),
            );
        }
        if let Some(company) = &changes.company {
            query = query.col_expr(workshops::Column::Company, Expr::value(company.clone()));
        }
        if let Some(date) = changes.date {
            query = query.col_expr(
                workshops::Column::Date,
                Expr::value(date.format(DATE_FORMAT).to_string()),
            );
        }
        if let Some(time) = &changes.time {
            query = query.col_expr(workshops::Column::Time, Expr::value(time.clone()));
        }
        if let Some(mode) = changes.mode {
            query = query.col_expr(workshops::Column::Mode, Expr::value(mode.as_str()));
        }
        if let Some(location) = &changes.location {
            query = query.col_expr(workshops::Column::Location, Expr::value(location.clone()));
        }
        if let Some(price) = changes.price {
            query = query.col_expr(workshops::Column::PriceCents, Expr::value(price.cents()));
        }
        if let Some(registration_mode) = changes.registration_mode {
            query = query.col_expr(
                workshops::Column::RegistrationMode,
                Expr::value(registration_mode.as_str()),
            );
        }
        if let Some(image) = &changes.image {
            query = query.col_expr(workshops::Column::Image, Expr::value(image.clone()));
        }
        if let Some(status) = changes.status {
            query = query.col_expr(workshops::Column::Status, Expr::value(status.as_str()));
        }
        if let Some(seats) = changes.seats {
            query = query
                .col_expr(workshops::Column::Seats, Expr::value(seats))
                .filter(workshops::Column::RegisteredSeats.lte(seats));
        }

        let result = query
            .exec(&txn)
            .await
            .context("Failed to update workshop")?;

        let current = Workshops::find_by_id(id.value()).one(&txn).await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(match current {
                None => WorkshopUpdateOutcome::NotFound,
                Some(model) => WorkshopUpdateOutcome::SeatsBelowRegistered {
                    registered: model.registered_seats,
                },
            });
        }

        txn.commit().await?;

        current
            .map(WorkshopUpdateOutcome::Updated)
            .ok_or_else(|| anyhow::anyhow!("Workshop {id} vanished during update"))
    }

    /// Deletes the workshop together with its registrations. Returns false if
    /// no such workshop exists.
    pub async fn delete(&self, id: WorkshopId) -> Result<bool> {
        let txn = self.conn.begin().await?;

        Registrations::delete_many()
            .filter(registrations::Column::WorkshopId.eq(id.value()))
            .exec(&txn)
            .await
            .context("Failed to delete workshop registrations")?;

        let result = Workshops::delete_by_id(id.value())
            .exec(&txn)
            .await
            .context("Failed to delete workshop")?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;
        Ok(true)
    }
}
