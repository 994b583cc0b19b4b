//! `SeaORM` implementation of the `UserService` trait.

use crate::config::Config;
use crate::db::{Store, UserDeleteOutcome, UserWriteOutcome};
use crate::domain::UserId;
use crate::domain::events::NotificationEvent;
use crate::models::{NewUser, User, UserChanges, UserFilter};
use crate::services::user_service::{UserError, UserService};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::info;

pub struct SeaOrmUserService {
    store: Store,
    config: Arc<RwLock<Config>>,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(
        store: Store,
        config: Arc<RwLock<Config>>,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            store,
            config,
            event_bus,
        }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list(&self, filter: UserFilter) -> Result<Vec<User>, UserError> {
        let rows = self.store.list_users(&filter).await?;

        rows.into_iter()
            .map(|row| User::try_from(row).map_err(UserError::from))
            .collect()
    }

    async fn get(&self, id: UserId) -> Result<User, UserError> {
        let row = self
            .store
            .get_user(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(User::try_from(row)?)
    }

    async fn get_by_username(&self, username: &str) -> Result<User, UserError> {
        let row = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| UserError::UsernameNotFound(username.to_string()))?;

        Ok(User::try_from(row)?)
    }

    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let security = self.config.read().await.security.clone();

        let created = match self.store.create_user(&user, &security).await? {
            UserWriteOutcome::Written(row) => User::try_from(row)?,
            UserWriteOutcome::UsernameTaken => {
                return Err(UserError::UsernameTaken(user.username));
            }
            UserWriteOutcome::EmailTaken => return Err(UserError::EmailTaken(user.email)),
            UserWriteOutcome::NotFound => {
                return Err(UserError::Internal("User vanished while being created".to_string()));
            }
        };

        info!(
            user_id = %created.id,
            username = %created.username,
            role = %created.role,
            "User created"
        );
        let _ = self.event_bus.send(NotificationEvent::UserCreated {
            user_id: created.id,
        });

        Ok(created)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, UserError> {
        let security = self.config.read().await.security.clone();

        let updated = match self.store.update_user(id, &changes, &security).await? {
            UserWriteOutcome::Written(row) => User::try_from(row)?,
            UserWriteOutcome::NotFound => return Err(UserError::NotFound(id)),
            UserWriteOutcome::UsernameTaken => {
                return Err(UserError::UsernameTaken(changes.username.unwrap_or_default()));
            }
            UserWriteOutcome::EmailTaken => {
                return Err(UserError::EmailTaken(changes.email.unwrap_or_default()));
            }
        };

        let _ = self
            .event_bus
            .send(NotificationEvent::UserUpdated { user_id: id });

        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        match self.store.delete_user(id).await? {
            UserDeleteOutcome::Deleted { released_seats } => {
                info!(user_id = %id, released_seats, "User deleted");
            }
            UserDeleteOutcome::NotFound => return Err(UserError::NotFound(id)),
        }

        let _ = self
            .event_bus
            .send(NotificationEvent::UserDeleted { user_id: id });

        Ok(())
    }
}
