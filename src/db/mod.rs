use crate::config::SecurityConfig;
use crate::domain::{RegistrationId, RegistrationStatus, UserId, WorkshopId};
use crate::models::{
    NewRegistration, NewUser, NewWorkshop, UserChanges, UserFilter, WorkshopChanges, WorkshopFilter,
};
use anyhow::Result;
use chrono::SecondsFormat;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{registrations, users, workshops};

pub mod migrator;
pub mod repositories;

pub use repositories::registration::{RegistrationOutcome, StatusChangeOutcome};
pub use repositories::report::{CountsByKey, OverviewRow};
pub use repositories::user::{UserDeleteOutcome, UserWriteOutcome};
pub use repositories::workshop::WorkshopUpdateOutcome;

/// Current time as fixed-width RFC 3339 UTC text, so stored timestamps sort
/// lexicographically in chronological order.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every pooled connection to `:memory:` would open its own empty database.
        let in_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections.min(max_connections))
        };

        if !in_memory {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn workshop_repo(&self) -> repositories::workshop::WorkshopRepository {
        repositories::workshop::WorkshopRepository::new(self.conn.clone())
    }

    fn registration_repo(&self) -> repositories::registration::RegistrationRepository {
        repositories::registration::RegistrationRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn report_repo(&self) -> repositories::report::ReportRepository {
        repositories::report::ReportRepository::new(self.conn.clone())
    }

    // Workshops

    pub async fn list_workshops(&self, filter: &WorkshopFilter) -> Result<Vec<workshops::Model>> {
        self.workshop_repo().list(filter).await
    }

    pub async fn get_workshop(&self, id: WorkshopId) -> Result<Option<workshops::Model>> {
        self.workshop_repo().get(id).await
    }

    pub async fn create_workshop(&self, workshop: &NewWorkshop) -> Result<workshops::Model> {
        self.workshop_repo().create(workshop).await
    }

    pub async fn update_workshop(
        &self,
        id: WorkshopId,
        changes: &WorkshopChanges,
    ) -> Result<WorkshopUpdateOutcome> {
        self.workshop_repo().update(id, changes).await
    }

    pub async fn delete_workshop(&self, id: WorkshopId) -> Result<bool> {
        self.workshop_repo().delete(id).await
    }

    // Registrations

    pub async fn create_registration(
        &self,
        registration: &NewRegistration,
    ) -> Result<RegistrationOutcome> {
        self.registration_repo().create(registration).await
    }

    pub async fn get_registration(
        &self,
        id: RegistrationId,
    ) -> Result<Option<registrations::Model>> {
        self.registration_repo().get(id).await
    }

    pub async fn list_registrations_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<registrations::Model>> {
        self.registration_repo().list_for_user(user_id).await
    }

    pub async fn list_registrations_for_workshop(
        &self,
        workshop_id: WorkshopId,
    ) -> Result<Vec<registrations::Model>> {
        self.registration_repo()
            .list_for_workshop(workshop_id)
            .await
    }

    pub async fn update_registration_status(
        &self,
        id: RegistrationId,
        status: RegistrationStatus,
    ) -> Result<StatusChangeOutcome> {
        self.registration_repo().update_status(id, status).await
    }

    // Users

    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<users::Model>> {
        self.user_repo().list(filter).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn create_user(
        &self,
        user: &NewUser,
        security: &SecurityConfig,
    ) -> Result<UserWriteOutcome> {
        self.user_repo().create(user, security).await
    }

    pub async fn update_user(
        &self,
        id: UserId,
        changes: &UserChanges,
        security: &SecurityConfig,
    ) -> Result<UserWriteOutcome> {
        self.user_repo().update(id, changes, security).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<UserDeleteOutcome> {
        self.user_repo().delete(id).await
    }

    // Reports

    pub async fn overview(&self) -> Result<OverviewRow> {
        self.report_repo().overview().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_fixed_width() {
        let a = now_timestamp();
        let b = now_timestamp();
        assert_eq!(a.len(), b.len());
        assert!(a.ends_with('Z'));
        assert!(a <= b);
    }

    #[tokio::test]
    async fn in_memory_store_migrates_and_pings() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        store.ping().await.unwrap();
        let workshops = store
            .list_workshops(&WorkshopFilter::default())
            .await
            .unwrap();
        assert!(workshops.is_empty());
    }
}
