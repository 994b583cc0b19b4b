use serde::Serialize;

use crate::domain::{UserId, UserRole};
use crate::entities::users;

/// Public view of an account. The password hash never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub company: Option<String>,
    pub created_at: String,
}

impl TryFrom<users::Model> for User {
    type Error = anyhow::Error;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(model.id),
            username: model.username,
            email: model.email,
            name: model.name,
            role: model.role.parse()?,
            company: model.company,
            created_at: model.created_at,
        })
    }
}

/// Validated input for account creation. `password` is plaintext and is
/// hashed before it reaches the database.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub company: Option<String>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("company", &self.company)
            .finish()
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub company: Option<Option<String>>,
}

impl UserChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.email.is_none()
            && self.name.is_none()
            && self.role.is_none()
            && self.company.is_none()
    }
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("company", &self.company)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_user_has_no_password() {
        let user = User::try_from(users::Model {
            id: 1,
            username: "admin".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            email: "admin@workshopwise.com".to_string(),
            name: "Admin User".to_string(),
            role: "admin".to_string(),
            company: None,
            created_at: "2025-01-01T00:00:00.000000Z".to_string(),
        })
        .unwrap();

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn debug_output_redacts_password() {
        let input = NewUser {
            username: "jane".to_string(),
            password: "hunter22".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            role: UserRole::User,
            company: None,
        };
        assert!(!format!("{input:?}").contains("hunter22"));
    }
}
