use crate::entities::{prelude::*, registrations, users, workshops};
use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QuerySelect};
use std::collections::BTreeMap;

/// Row counts keyed by a stored enum value.
pub type CountsByKey = BTreeMap<String, u64>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewRow {
    pub users_by_role: CountsByKey,
    pub workshops_by_status: CountsByKey,
    pub registrations_by_status: CountsByKey,
    pub total_seats: i64,
    pub registered_seats: i64,
}

pub struct ReportRepository {
    conn: DatabaseConnection,
}

impl ReportRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn overview(&self) -> Result<OverviewRow> {
        let users_by_role: Vec<(String, i64)> = Users::find()
            .select_only()
            .column(users::Column::Role)
            .column_as(users::Column::Id.count(), "count")
            .group_by(users::Column::Role)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count users by role")?;

        let workshops_by_status: Vec<(String, i64)> = Workshops::find()
            .select_only()
            .column(workshops::Column::Status)
            .column_as(workshops::Column::Id.count(), "count")
            .group_by(workshops::Column::Status)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count workshops by status")?;

        let registrations_by_status: Vec<(String, i64)> = Registrations::find()
            .select_only()
            .column(registrations::Column::Status)
            .column_as(registrations::Column::Id.count(), "count")
            .group_by(registrations::Column::Status)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count registrations by status")?;

        let seat_totals: Option<(Option<i64>, Option<i64>)> = Workshops::find()
            .select_only()
            .column_as(workshops::Column::Seats.sum(), "total_seats")
            .column_as(workshops::Column::RegisteredSeats.sum(), "registered_seats")
            .into_tuple()
            .one(&self.conn)
            .await
            .context("Failed to sum workshop seats")?;

        let (total_seats, registered_seats) = seat_totals.unwrap_or_default();

        Ok(OverviewRow {
            users_by_role: into_counts(users_by_role),
            workshops_by_status: into_counts(workshops_by_status),
            registrations_by_status: into_counts(registrations_by_status),
            total_seats: total_seats.unwrap_or_default(),
            registered_seats: registered_seats.unwrap_or_default(),
        })
    }
}

fn into_counts(rows: Vec<(String, i64)>) -> CountsByKey {
    rows.into_iter()
        .map(|(key, count)| (key, u64::try_from(count).unwrap_or_default()))
        .collect()
}
