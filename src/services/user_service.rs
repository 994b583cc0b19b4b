//! Domain service for user accounts managed from the admin console.

use crate::domain::UserId;
use crate::models::{NewUser, User, UserChanges, UserFilter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("User not found: {0}")]
    UsernameNotFound(String),

    #[error("Username is already taken: {0}")]
    UsernameTaken(String),

    #[error("Email is already registered: {0}")]
    EmailTaken(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn list(&self, filter: UserFilter) -> Result<Vec<User>, UserError>;

    async fn get(&self, id: UserId) -> Result<User, UserError>;

    async fn get_by_username(&self, username: &str) -> Result<User, UserError>;

    /// Creates an account. The password is hashed with the configured Argon2 parameters.
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, UserError>;

    /// Deletes the account and its registrations, releasing any seats they held.
    async fn delete(&self, id: UserId) -> Result<(), UserError>;
}
