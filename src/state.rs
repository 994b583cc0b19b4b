use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use crate::config::Config;
use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::services::{
    RegistrationService, ReportService, SeaOrmRegistrationService, SeaOrmReportService,
    SeaOrmUserService, SeaOrmWorkshopService, UserService, WorkshopService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub event_bus: broadcast::Sender<NotificationEvent>,

    pub workshop_service: Arc<dyn WorkshopService>,

    pub registration_service: Arc<dyn RegistrationService>,

    pub user_service: Arc<dyn UserService>,

    pub report_service: Arc<dyn ReportService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size.max(1));
        Self::with_event_bus(config, event_bus).await
    }

    pub async fn with_event_bus(
        config: Config,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let config = Arc::new(RwLock::new(config));

        let workshop_service = Arc::new(SeaOrmWorkshopService::new(
            store.clone(),
            event_bus.clone(),
        )) as Arc<dyn WorkshopService + Send + Sync + 'static>;

        let registration_service = Arc::new(SeaOrmRegistrationService::new(
            store.clone(),
            event_bus.clone(),
        )) as Arc<dyn RegistrationService + Send + Sync + 'static>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.clone(),
            event_bus.clone(),
        )) as Arc<dyn UserService + Send + Sync + 'static>;

        let report_service = Arc::new(SeaOrmReportService::new(store.clone()))
            as Arc<dyn ReportService + Send + Sync + 'static>;

        Ok(Self {
            config,
            store,
            event_bus,
            workshop_service,
            registration_service,
            user_service,
            report_service,
        })
    }
}
