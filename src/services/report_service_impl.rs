//! `SeaORM` implementation of the `ReportService` trait.

use crate::db::{CountsByKey, OverviewRow, Store};
use crate::domain::{RegistrationStatus, UserRole, WorkshopStatus};
use crate::services::report_service::{Overview, ReportError, ReportService};
use async_trait::async_trait;
use std::collections::BTreeMap;

pub struct SeaOrmReportService {
    store: Store,
}

impl SeaOrmReportService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Fills in zero counts for every key in `keys`.
fn complete<'a>(
    counts: &CountsByKey,
    keys: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<String, u64> {
    keys.into_iter()
        .map(|key| {
            let count = counts.get(key).copied().unwrap_or_default();
            (key.to_string(), count)
        })
        .collect()
}

fn build_overview(row: &OverviewRow) -> Overview {
    let users_by_role = complete(
        &row.users_by_role,
        UserRole::ALL.iter().map(UserRole::as_str),
    );
    let workshops_by_status = complete(
        &row.workshops_by_status,
        WorkshopStatus::ALL.iter().map(WorkshopStatus::as_str),
    );
    let registrations_by_status = complete(
        &row.registrations_by_status,
        RegistrationStatus::ALL
            .iter()
            .map(RegistrationStatus::as_str),
    );

    let workshops_with = |status: WorkshopStatus| {
        row.workshops_by_status
            .get(status.as_str())
            .copied()
            .unwrap_or_default()
    };

    Overview {
        total_users: row.users_by_role.values().sum(),
        users_by_role,
        total_workshops: row.workshops_by_status.values().sum(),
        active_workshops: workshops_with(WorkshopStatus::Active),
        completed_workshops: workshops_with(WorkshopStatus::Completed),
        workshops_by_status,
        total_registrations: row.registered_seats,
        available_seats: row.total_seats - row.registered_seats,
        registrations_by_status,
    }
}

#[async_trait]
impl ReportService for SeaOrmReportService {
    async fn overview(&self) -> Result<Overview, ReportError> {
        let row = self.store.overview().await?;
        Ok(build_overview(&row))
    }
}
