pub use super::registrations::Entity as Registrations;
pub use super::users::Entity as Users;
pub use super::workshops::Entity as Workshops;
