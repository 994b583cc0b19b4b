//! Aggregates behind the admin dashboard.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReportError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Platform-wide totals.
///
/// Every known role and status appears as a key, with zero when nothing
/// matches.
///
/// ```
/// use workshopwise::services::report_service::Overview;
///
/// let overview = Overview::default();
/// assert_eq!(overview.total_registrations, 0);
/// assert_eq!(overview.available_seats, 0);
/// ```
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_users: u64,
    pub users_by_role: BTreeMap<String, u64>,
    pub total_workshops: u64,
    pub active_workshops: u64,
    pub completed_workshops: u64,
    pub workshops_by_status: BTreeMap<String, u64>,
    /// Seats taken across all workshops.
    pub total_registrations: i64,
    pub available_seats: i64,
    pub registrations_by_status: BTreeMap<String, u64>,
}

#[async_trait::async_trait]
pub trait ReportService: Send + Sync {
    async fn overview(&self) -> Result<Overview, ReportError>;
}
