use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Price, RegistrationMode, WorkshopId, WorkshopMode, WorkshopStatus};
use crate::entities::workshops;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    pub id: WorkshopId,
    pub title: String,
    pub description: String,
    pub company: String,
    pub date: NaiveDate,
    pub time: String,
    pub mode: WorkshopMode,
    pub location: Option<String>,
    pub price: Price,
    pub seats: i32,
    pub registered_seats: i32,
    pub registration_mode: RegistrationMode,
    pub image: String,
    pub status: WorkshopStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Workshop {
    #[must_use]
    pub const fn available_seats(&self) -> i32 {
        self.seats - self.registered_seats
    }

    #[must_use]
    pub const fn is_fully_booked(&self) -> bool {
        self.registered_seats >= self.seats
    }
}

impl TryFrom<workshops::Model> for Workshop {
    type Error = anyhow::Error;

    fn try_from(model: workshops::Model) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&model.date, DATE_FORMAT)
            .with_context(|| format!("Workshop {} has malformed date '{}'", model.id, model.date))?;

        Ok(Self {
            id: WorkshopId::new(model.id),
            title: model.title,
            description: model.description,
            company: model.company,
            date,
            time: model.time,
            mode: model.mode.parse()?,
            location: model.location,
            price: Price::from_cents(model.price_cents),
            seats: model.seats,
            registered_seats: model.registered_seats,
            registration_mode: model.registration_mode.parse()?,
            image: model.image,
            status: model.status.parse()?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// A validated workshop ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkshop {
    pub title: String,
    pub description: String,
    pub company: String,
    pub date: NaiveDate,
    pub time: String,
    pub mode: WorkshopMode,
    pub location: Option<String>,
    pub price: Price,
    pub seats: i32,
    pub registration_mode: RegistrationMode,
    pub image: String,
    pub status: WorkshopStatus,
}

/// Partial update. `None` leaves the column untouched; for `location`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkshopChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub mode: Option<WorkshopMode>,
    pub location: Option<Option<String>>,
    pub price: Option<Price>,
    pub seats: Option<i32>,
    pub registration_mode: Option<RegistrationMode>,
    pub image: Option<String>,
    pub status: Option<WorkshopStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkshopFilter {
    /// Case-insensitive substring of title or company.
    pub search: Option<String>,
    pub status: Option<WorkshopStatus>,
    pub mode: Option<WorkshopMode>,
}
