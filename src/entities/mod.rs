pub mod prelude;

pub mod registrations;
pub mod users;
pub mod workshops;
