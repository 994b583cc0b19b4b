pub mod registration;
pub mod user;
pub mod workshop;

pub use registration::{NewRegistration, Registration};
pub use user::{NewUser, User, UserChanges, UserFilter};
pub use workshop::{NewWorkshop, Workshop, WorkshopChanges, WorkshopFilter};
