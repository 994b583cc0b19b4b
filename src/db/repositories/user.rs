use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::BTreeMap;
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::now_timestamp;
use crate::db::repositories::{contains_pattern, is_unique_violation};
use crate::domain::{RegistrationStatus, UserId};
use crate::entities::{prelude::*, registrations, users, workshops};
use crate::models::{NewUser, UserChanges, UserFilter};

#[derive(Debug)]
pub enum UserWriteOutcome {
    Written(users::Model),
    NotFound,
    UsernameTaken,
    EmailTaken,
}

#[derive(Debug)]
pub enum UserDeleteOutcome {
    Deleted { released_seats: u64 },
    NotFound,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<users::Model>> {
        let mut query = Users::find();

        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }
        let search = filter.search.as_deref().map(str::trim);
        if let Some(term) = search.filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(users::Column::Name.like(contains_pattern(term)))
                    .add(users::Column::Email.like(contains_pattern(term))),
            );
        }

        query
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<users::Model>> {
        Users::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")
    }

    pub async fn create(
        &self,
        user: &NewUser,
        security: &SecurityConfig,
    ) -> Result<UserWriteOutcome> {
        if let Some(taken) = self
            .find_conflict(None, Some(&user.username), Some(&user.email))
            .await?
        {
            return Ok(taken);
        }

        let password = user.password.clone();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let active = users::ActiveModel {
            username: Set(user.username.clone()),
            password_hash: Set(password_hash),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            role: Set(user.role.as_str().to_string()),
            company: Set(user.company.clone()),
            created_at: Set(now_timestamp()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(UserWriteOutcome::Written(model)),
            Err(err) if is_unique_violation(&err) => Ok(conflict_from_message(&err.to_string())),
            Err(err) => Err(err).context("Failed to insert user"),
        }
    }

    pub async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
        security: &SecurityConfig,
    ) -> Result<UserWriteOutcome> {
        let Some(user) = self.get_by_id(id).await? else {
            return Ok(UserWriteOutcome::NotFound);
        };

        if changes.is_empty() {
            return Ok(UserWriteOutcome::Written(user));
        }

        let new_username = changes.username.as_deref().filter(|u| *u != user.username);
        let new_email = changes.email.as_deref().filter(|e| *e != user.email);
        if let Some(taken) = self.find_conflict(Some(id), new_username, new_email).await? {
            return Ok(taken);
        }

        let new_hash = match changes.password.clone() {
            Some(password) => {
                let security = security.clone();
                Some(
                    task::spawn_blocking(move || hash_password(&password, Some(&security)))
                        .await
                        .context("Password hashing task panicked")??,
                )
            }
            None => None,
        };

        let mut active: users::ActiveModel = user.into();
        if let Some(username) = &changes.username {
            active.username = Set(username.clone());
        }
        if let Some(hash) = new_hash {
            active.password_hash = Set(hash);
        }
        if let Some(email) = &changes.email {
            active.email = Set(email.clone());
        }
        if let Some(name) = &changes.name {
            active.name = Set(name.clone());
        }
        if let Some(role) = changes.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(company) = &changes.company {
            active.company = Set(company.clone());
        }

        match active.update(&self.conn).await {
            Ok(model) => Ok(UserWriteOutcome::Written(model)),
            Err(err) if is_unique_violation(&err) => Ok(conflict_from_message(&err.to_string())),
            Err(err) => Err(err).context("Failed to update user"),
        }
    }

    /// Deletes a user after releasing the seats held by their live
    /// registrations, all in one transaction.
    pub async fn delete(&self, id: UserId) -> Result<UserDeleteOutcome> {
        let txn = self.conn.begin().await?;

        // No-op write: takes the write lock before anything is read.
        let touched = Users::update_many()
            .col_expr(users::Column::Id, Expr::col(users::Column::Id).into())
            .filter(users::Column::Id.eq(id.value()))
            .exec(&txn)
            .await
            .context("Failed to lock user for deletion")?;

        if touched.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(UserDeleteOutcome::NotFound);
        }

        let live = Registrations::find()
            .filter(registrations::Column::UserId.eq(id.value()))
            .filter(registrations::Column::Status.ne(RegistrationStatus::Cancelled.as_str()))
            .all(&txn)
            .await?;

        let mut held: BTreeMap<i32, i32> = BTreeMap::new();
        for registration in &live {
            *held.entry(registration.workshop_id).or_default() += 1;
        }

        let mut released_seats = 0;
        for (workshop_id, count) in held {
            let result = Workshops::update_many()
                .col_expr(
                    workshops::Column::RegisteredSeats,
                    Expr::col(workshops::Column::RegisteredSeats).sub(count),
                )
                .filter(workshops::Column::Id.eq(workshop_id))
                .filter(workshops::Column::RegisteredSeats.gte(count))
                .exec(&txn)
                .await
                .context("Failed to release seats of deleted user")?;
            if result.rows_affected > 0 {
                released_seats += u64::try_from(count).unwrap_or_default();
            }
        }

        Registrations::delete_many()
            .filter(registrations::Column::UserId.eq(id.value()))
            .exec(&txn)
            .await
            .context("Failed to delete user registrations")?;

        Users::delete_by_id(id.value())
            .exec(&txn)
            .await
            .context("Failed to delete user")?;

        txn.commit().await?;
        Ok(UserDeleteOutcome::Deleted { released_seats })
    }

    async fn find_conflict(
        &self,
        exclude: Option<UserId>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserWriteOutcome>> {
        let others = |query: sea_orm::Select<Users>| match exclude {
            Some(id) => query.filter(users::Column::Id.ne(id.value())),
            None => query,
        };

        if let Some(username) = username {
            let taken = others(Users::find())
                .filter(users::Column::Username.eq(username))
                .one(&self.conn)
                .await?;
            if taken.is_some() {
                return Ok(Some(UserWriteOutcome::UsernameTaken));
            }
        }

        if let Some(email) = email {
            let taken = others(Users::find())
                .filter(users::Column::Email.eq(email))
                .one(&self.conn)
                .await?;
            if taken.is_some() {
                return Ok(Some(UserWriteOutcome::EmailTaken));
            }
        }

        Ok(None)
    }
}

fn conflict_from_message(message: &str) -> UserWriteOutcome {
    if message.contains("users.email") {
        UserWriteOutcome::EmailTaken
    } else {
        UserWriteOutcome::UsernameTaken
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    #[test]
    fn hashes_verify_and_are_salted() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };
        let first = hash_password("correct horse", Some(&config)).unwrap();
        let second = hash_password("correct horse", Some(&config)).unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&first).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"correct horse", &parsed)
                .is_ok()
        );
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }

    #[test]
    fn unique_violation_message_picks_column() {
        assert!(matches!(
            conflict_from_message("UNIQUE constraint failed: users.email"),
            UserWriteOutcome::EmailTaken
        ));
        assert!(matches!(
            conflict_from_message("UNIQUE constraint failed: users.username"),
            UserWriteOutcome::UsernameTaken
        ));
    }
}
