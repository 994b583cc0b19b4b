pub mod workshop_service;
pub mod workshop_service_impl;
pub use workshop_service::{WorkshopError, WorkshopService};
pub use workshop_service_impl::SeaOrmWorkshopService;

pub mod registration_service;
pub mod registration_service_impl;
pub use registration_service::{RegistrationError, RegistrationService};
pub use registration_service_impl::SeaOrmRegistrationService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;

pub mod report_service;
pub mod report_service_impl;
pub use report_service::{Overview, ReportError, ReportService};
pub use report_service_impl::SeaOrmReportService;
