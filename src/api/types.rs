//! Request payloads and their validation into domain inputs.
//!
//! Fields are loosely typed (`Option`, raw JSON values) so a malformed payload
//! produces one `details` entry per bad field instead of a single parse error.

use serde::{Deserialize, Deserializer};

use super::ApiError;
use super::validation::{
    Violations, optional_text, parse_date, parse_enum, parse_id, parse_price, parse_seats,
    required_text, validate_email, validate_password, validate_search_query,
};
use crate::domain::{
    RegistrationMode, RegistrationStatus, UserId, UserRole, WorkshopId, WorkshopMode,
    WorkshopStatus,
};
use crate::models::{
    NewRegistration, NewUser, NewWorkshop, UserChanges, UserFilter, WorkshopChanges, WorkshopFilter,
};

const TITLE_MAX: usize = 255;
const COMPANY_MAX: usize = 255;
const LOCATION_MAX: usize = 255;
const TIME_MAX: usize = 20;
const IMAGE_MAX: usize = 500;
const SCREENSHOT_MAX: usize = 500;
const DESCRIPTION_MAX: usize = 10_000;
const NOTES_MAX: usize = 2_000;
const NAME_MAX: usize = 255;
const USERNAME_MAX: usize = 255;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkshopRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub location: Option<String>,
    pub price: Option<serde_json::Value>,
    pub seats: Option<serde_json::Value>,
    pub registration_mode: Option<String>,
    pub image: Option<String>,
    pub status: Option<String>,
}

impl CreateWorkshopRequest {
    pub fn validate(self) -> Result<NewWorkshop, ApiError> {
        let mut v = Violations::new();

        let title = v.check("title", required_text(self.title.as_deref(), TITLE_MAX));
        let description = v.check(
            "description",
            optional_text(self.description.as_deref(), DESCRIPTION_MAX),
        );
        let company = v.check(
            "company",
            required_text(self.company.as_deref(), COMPANY_MAX),
        );
        let date = v.check(
            "date",
            required_text(self.date.as_deref(), 10).and_then(|d| parse_date(&d)),
        );
        let time = v.check("time", required_text(self.time.as_deref(), TIME_MAX));
        let mode = v.check(
            "mode",
            required_text(self.mode.as_deref(), 20).and_then(|m| parse_enum::<WorkshopMode>(&m)),
        );
        let location = v.check(
            "location",
            optional_text(self.location.as_deref(), LOCATION_MAX),
        );
        let price = v.check(
            "price",
            self.price
                .as_ref()
                .ok_or_else(|| "is required".to_string())
                .and_then(parse_price),
        );
        let seats = v.check(
            "seats",
            self.seats
                .as_ref()
                .ok_or_else(|| "is required".to_string())
                .and_then(parse_seats),
        );
        let registration_mode = v.check(
            "registrationMode",
            self.registration_mode
                .as_deref()
                .map_or(Ok(RegistrationMode::default()), parse_enum),
        );
        let image = v.check("image", required_text(self.image.as_deref(), IMAGE_MAX));
        let status = v.check(
            "status",
            self.status
                .as_deref()
                .map_or(Ok(WorkshopStatus::default()), parse_enum),
        );

        v.into_result()?;

        match (
            title,
            description,
            company,
            date,
            time,
            mode,
            location,
            price,
            seats,
            registration_mode,
            image,
            status,
        ) {
            (
                Some(title),
                Some(description),
                Some(company),
                Some(date),
                Some(time),
                Some(mode),
                Some(location),
                Some(price),
                Some(seats),
                Some(registration_mode),
                Some(image),
                Some(status),
            ) => Ok(NewWorkshop {
                title,
                description: description.unwrap_or_default(),
                company,
                date,
                time,
                mode,
                location,
                price,
                seats,
                registration_mode,
                image,
                status,
            }),
            _ => Err(ApiError::internal("workshop validation lost a field")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkshopRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    pub price: Option<serde_json::Value>,
    pub seats: Option<serde_json::Value>,
    pub registration_mode: Option<String>,
    pub image: Option<String>,
    pub status: Option<String>,
}

impl UpdateWorkshopRequest {
    pub fn validate(self) -> Result<WorkshopChanges, ApiError> {
        let mut v = Violations::new();

        let changes = WorkshopChanges {
            title: self
                .title
                .as_deref()
                .and_then(|t| v.check("title", required_text(Some(t), TITLE_MAX))),
            description: self
                .description
                .as_deref()
                .and_then(|d| v.check("description", optional_text(Some(d), DESCRIPTION_MAX)))
                .map(Option::unwrap_or_default),
            company: self
                .company
                .as_deref()
                .and_then(|c| v.check("company", required_text(Some(c), COMPANY_MAX))),
            date: self
                .date
                .as_deref()
                .and_then(|d| v.check("date", parse_date(d))),
            time: self
                .time
                .as_deref()
                .and_then(|t| v.check("time", required_text(Some(t), TIME_MAX))),
            mode: self
                .mode
                .as_deref()
                .and_then(|m| v.check("mode", parse_enum(m))),
            location: match self.location {
                None => None,
                Some(None) => Some(None),
                Some(Some(location)) => {
                    v.check("location", optional_text(Some(&location), LOCATION_MAX))
                }
            },
            price: self
                .price
                .as_ref()
                .and_then(|p| v.check("price", parse_price(p))),
            seats: self
                .seats
                .as_ref()
                .and_then(|s| v.check("seats", parse_seats(s))),
            registration_mode: self
                .registration_mode
                .as_deref()
                .and_then(|m| v.check("registrationMode", parse_enum(m))),
            image: self
                .image
                .as_deref()
                .and_then(|i| v.check("image", required_text(Some(i), IMAGE_MAX))),
            status: self
                .status
                .as_deref()
                .and_then(|s| v.check("status", parse_enum(s))),
        };

        v.into_result()?;
        Ok(changes)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkshopListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub mode: Option<String>,
}

impl WorkshopListQuery {
    pub fn validate(self) -> Result<WorkshopFilter, ApiError> {
        let mut v = Violations::new();

        let filter = WorkshopFilter {
            search: validate_search_query(self.q.as_deref()),
            status: self
                .status
                .as_deref()
                .and_then(|s| v.check("status", parse_enum(s))),
            mode: self
                .mode
                .as_deref()
                .and_then(|m| v.check("mode", parse_enum(m))),
        };

        v.into_result()?;
        Ok(filter)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    pub user_id: Option<serde_json::Value>,
    pub workshop_id: Option<serde_json::Value>,
    pub payment_screenshot: Option<String>,
    pub notes: Option<String>,
}

impl CreateRegistrationRequest {
    pub fn validate(self) -> Result<NewRegistration, ApiError> {
        let mut v = Violations::new();

        let user_id = v.check("userId", parse_id(self.user_id.as_ref()));
        let workshop_id = v.check("workshopId", parse_id(self.workshop_id.as_ref()));
        let payment_screenshot = v.check(
            "paymentScreenshot",
            optional_text(self.payment_screenshot.as_deref(), SCREENSHOT_MAX),
        );
        let notes = v.check("notes", optional_text(self.notes.as_deref(), NOTES_MAX));

        v.into_result()?;

        match (user_id, workshop_id, payment_screenshot, notes) {
            (Some(user_id), Some(workshop_id), Some(payment_screenshot), Some(notes)) => {
                Ok(NewRegistration {
                    user_id: UserId::new(user_id),
                    workshop_id: WorkshopId::new(workshop_id),
                    payment_screenshot,
                    notes,
                })
            }
            _ => Err(ApiError::internal("registration validation lost a field")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRegistrationStatusRequest {
    pub status: Option<String>,
}

impl UpdateRegistrationStatusRequest {
    pub fn validate(self) -> Result<RegistrationStatus, ApiError> {
        let mut v = Violations::new();
        let status = v.check(
            "status",
            required_text(self.status.as_deref(), 20)
                .and_then(|s| parse_enum::<RegistrationStatus>(&s)),
        );
        v.into_result()?;
        status.ok_or_else(|| ApiError::internal("status validation lost a field"))
    }
}

#[derive(Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let mut v = Violations::new();

        let username = v.check(
            "username",
            required_text(self.username.as_deref(), USERNAME_MAX),
        );
        let password = v.check("password", validate_password(self.password.as_deref()));
        let email = v.check("email", validate_email(self.email.as_deref()));
        let name = v.check("name", required_text(self.name.as_deref(), NAME_MAX));
        let role = v.check(
            "role",
            self.role
                .as_deref()
                .map_or(Ok(UserRole::default()), parse_enum),
        );
        let company = v.check(
            "company",
            optional_text(self.company.as_deref(), COMPANY_MAX),
        );

        v.into_result()?;

        match (username, password, email, name, role, company) {
            (
                Some(username),
                Some(password),
                Some(email),
                Some(name),
                Some(role),
                Some(company),
            ) => Ok(NewUser {
                username,
                password,
                email,
                name,
                role,
                company,
            }),
            _ => Err(ApiError::internal("user validation lost a field")),
        }
    }
}

#[derive(Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub company: Option<Option<String>>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UserChanges, ApiError> {
        let mut v = Violations::new();

        let changes = UserChanges {
            username: self
                .username
                .as_deref()
                .and_then(|u| v.check("username", required_text(Some(u), USERNAME_MAX))),
            password: self
                .password
                .as_deref()
                .and_then(|p| v.check("password", validate_password(Some(p)))),
            email: self
                .email
                .as_deref()
                .and_then(|e| v.check("email", validate_email(Some(e)))),
            name: self
                .name
                .as_deref()
                .and_then(|n| v.check("name", required_text(Some(n), NAME_MAX))),
            role: self
                .role
                .as_deref()
                .and_then(|r| v.check("role", parse_enum(r))),
            company: match self.company {
                None => None,
                Some(None) => Some(None),
                Some(Some(company)) => {
                    v.check("company", optional_text(Some(&company), COMPANY_MAX))
                }
            },
        };

        v.into_result()?;
        Ok(changes)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
    pub q: Option<String>,
}

impl UserListQuery {
    pub fn validate(self) -> Result<UserFilter, ApiError> {
        let mut v = Violations::new();

        let filter = UserFilter {
            role: self
                .role
                .as_deref()
                .and_then(|r| v.check("role", parse_enum(r))),
            search: validate_search_query(self.q.as_deref()),
        };

        v.into_result()?;
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_names(err: ApiError) -> Vec<String> {
        match err {
            ApiError::InvalidData(details) => details.into_iter().map(|d| d.field).collect(),
            other => panic!("expected InvalidData, got {other:?}"),
        }
    }

    #[test]
    fn create_workshop_applies_defaults() {
        let request: CreateWorkshopRequest = serde_json::from_value(json!({
            "title": "Advanced React Development",
            "company": "TechCorp Solutions",
            "date": "2025-01-15",
            "time": "10:00 AM",
            "mode": "online",
            "price": "2500.00",
            "seats": 25,
            "image": "/images/react.png"
        }))
        .unwrap();

        let workshop = request.validate().unwrap();
        assert_eq!(workshop.description, "");
        assert_eq!(workshop.registration_mode, RegistrationMode::Automated);
        assert_eq!(workshop.status, WorkshopStatus::Active);
        assert_eq!(workshop.price.cents(), 250_000);
        assert_eq!(workshop.location, None);
    }

    #[test]
    fn create_workshop_reports_every_bad_field() {
        let request: CreateWorkshopRequest = serde_json::from_value(json!({
            "title": "",
            "date": "2025-13-01",
            "mode": "remote",
            "price": -5,
            "seats": 0
        }))
        .unwrap();

        let fields = field_names(request.validate().unwrap_err());
        for expected in [
            "title", "company", "date", "time", "mode", "price", "seats", "image",
        ] {
            assert!(fields.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn update_workshop_distinguishes_null_location() {
        let cleared: UpdateWorkshopRequest =
            serde_json::from_value(json!({ "location": null })).unwrap();
        assert_eq!(cleared.validate().unwrap().location, Some(None));

        let untouched: UpdateWorkshopRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(untouched.validate().unwrap(), WorkshopChanges::default());
    }

    #[test]
    fn update_workshop_validates_supplied_fields_only() {
        let request: UpdateWorkshopRequest =
            serde_json::from_value(json!({ "seats": 0, "title": "New title" })).unwrap();
        assert_eq!(field_names(request.validate().unwrap_err()), vec!["seats"]);
    }

    #[test]
    fn registration_requires_ids() {
        let request: CreateRegistrationRequest =
            serde_json::from_value(json!({ "userId": "abc" })).unwrap();
        assert_eq!(
            field_names(request.validate().unwrap_err()),
            vec!["userId", "workshopId"]
        );
    }

    #[test]
    fn status_request_rejects_unknown_status() {
        let request: UpdateRegistrationStatusRequest =
            serde_json::from_value(json!({ "status": "approved" })).unwrap();
        assert_eq!(field_names(request.validate().unwrap_err()), vec!["status"]);
    }

    #[test]
    fn create_user_defaults_role() {
        let request: CreateUserRequest = serde_json::from_value(json!({
            "username": "jane",
            "password": "s3cret-pass",
            "email": "jane@example.com",
            "name": "Jane Doe"
        }))
        .unwrap();
        let user = request.validate().unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.company, None);
    }

    #[test]
    fn list_query_rejects_unknown_filter() {
        let query = WorkshopListQuery {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert_eq!(field_names(query.validate().unwrap_err()), vec!["status"]);
    }
}
