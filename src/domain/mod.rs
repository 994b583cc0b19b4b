//! Domain types for workshops, users and registrations with strong typing.
//!
//! Ids are newtypes so a `WorkshopId` can never be passed where a `UserId` is
//! expected. The string enumerations mirror the values stored in the database
//! and exchanged over JSON.

pub mod events;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_i32(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                i32::deserialize(deserializer).map(Self::new)
            }
        }
    };
}

entity_id!(
    /// Primary key of a row in `users`.
    UserId
);
entity_id!(
    /// Primary key of a row in `workshops`.
    WorkshopId
);
entity_id!(
    /// Primary key of a row in `registrations`.
    RegistrationId
);

/// Returned when a stored or submitted value is not one of an enum's variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}', expected one of: {}",
            self.kind, self.value, self.expected
        )
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }

            const EXPECTED: &'static str = concat!($($value, " "),+);
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                        expected: Self::EXPECTED.trim_end(),
                    }),
                }
            }
        }
    };
}

string_enum!(
    /// Account type. Enterprise users host workshops; admins run the console.
    UserRole, "role" {
        User => "user",
        Enterprise => "enterprise",
        Admin => "admin",
    }
);

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

string_enum!(
    /// How attendees join a workshop.
    WorkshopMode, "mode" {
        Online => "online",
        Offline => "offline",
        Hybrid => "hybrid",
    }
);

string_enum!(
    /// Whether submitted registrations are confirmed immediately or wait for an admin.
    RegistrationMode, "registration mode" {
        Automated => "automated",
        Manual => "manual",
    }
);

impl Default for RegistrationMode {
    fn default() -> Self {
        Self::Automated
    }
}

impl RegistrationMode {
    /// Status a freshly submitted registration starts in.
    #[must_use]
    pub const fn initial_status(&self) -> RegistrationStatus {
        match self {
            Self::Automated => RegistrationStatus::Confirmed,
            Self::Manual => RegistrationStatus::Pending,
        }
    }
}

string_enum!(
    /// Lifecycle of a workshop listing. Only active workshops accept registrations.
    WorkshopStatus, "workshop status" {
        Active => "active",
        Inactive => "inactive",
        Completed => "completed",
    }
);

impl Default for WorkshopStatus {
    fn default() -> Self {
        Self::Active
    }
}

string_enum!(
    /// Lifecycle of a single registration.
    RegistrationStatus, "registration status" {
        Pending => "pending",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

impl RegistrationStatus {
    /// Statuses a registration may move to `self` from.
    ///
    /// ```
    /// use workshopwise::domain::RegistrationStatus;
    ///
    /// assert_eq!(
    ///     RegistrationStatus::Completed.allowed_predecessors(),
    ///     &[RegistrationStatus::Confirmed]
    /// );
    /// assert!(RegistrationStatus::Pending.allowed_predecessors().is_empty());
    /// ```
    #[must_use]
    pub const fn allowed_predecessors(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[],
            Self::Confirmed => &[Self::Pending],
            Self::Completed => &[Self::Confirmed],
            Self::Cancelled => &[Self::Pending, Self::Confirmed],
        }
    }

    /// Whether a registration in this status occupies one of the workshop's seats.
    #[must_use]
    pub const fn holds_seat(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Workshop price with two decimal places, stored as an integer number of cents.
///
/// Accepts JSON numbers (`2500`, `19.99`) or decimal strings (`"2500.00"`) and
/// always serializes as a string with two decimals, matching a
/// `numeric(10, 2)` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price(i64);

impl Price {
    /// Largest value representable with precision 10, scale 2.
    pub const MAX_CENTS: i64 = 99_999_999_99;

    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPrice(String);

impl fmt::Display for InvalidPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid price '{}': expected a non-negative amount with at most 2 decimals",
            self.0
        )
    }
}

impl std::error::Error for InvalidPrice {}

impl FromStr for Price {
    type Err = InvalidPrice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidPrice(s.to_string());
        let trimmed = s.trim();

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .filter(|c| *c <= Self::MAX_CENTS)
            .ok_or_else(invalid)?;

        Ok(Self(cents))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_do_not_mix_and_serialize_as_numbers() {
        let id = WorkshopId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: UserId = serde_json::from_str("12").unwrap();
        assert_eq!(i32::from(back), 12);
    }

    #[test]
    fn enums_parse_stored_values() {
        assert_eq!("hybrid".parse::<WorkshopMode>(), Ok(WorkshopMode::Hybrid));
        assert_eq!(
            "manual".parse::<RegistrationMode>(),
            Ok(RegistrationMode::Manual)
        );
        assert_eq!(UserRole::Enterprise.as_str(), "enterprise");

        let err = "remote".parse::<WorkshopMode>().unwrap_err();
        assert_eq!(err.expected, "online offline hybrid");
        assert!(err.to_string().contains("remote"));
    }

    #[test]
    fn enums_serialize_lowercase() {
        let json = serde_json::to_string(&RegistrationStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let status: WorkshopStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, WorkshopStatus::Completed);
    }

    #[test]
    fn registration_transitions() {
        use RegistrationStatus::*;

        let allowed = |from: RegistrationStatus, to: RegistrationStatus| {
            to.allowed_predecessors().contains(&from)
        };

        assert!(allowed(Pending, Confirmed));
        assert!(allowed(Pending, Cancelled));
        assert!(allowed(Confirmed, Completed));
        assert!(allowed(Confirmed, Cancelled));

        assert!(!allowed(Pending, Completed));
        assert!(!allowed(Cancelled, Confirmed));
        assert!(!allowed(Completed, Cancelled));
        assert!(!allowed(Confirmed, Pending));
        assert!(!allowed(Confirmed, Confirmed));
    }

    #[test]
    fn seat_holding_statuses() {
        assert!(RegistrationStatus::Pending.holds_seat());
        assert!(RegistrationStatus::Completed.holds_seat());
        assert!(!RegistrationStatus::Cancelled.holds_seat());
    }

    #[test]
    fn registration_mode_initial_status() {
        assert_eq!(
            RegistrationMode::Automated.initial_status(),
            RegistrationStatus::Confirmed
        );
        assert_eq!(
            RegistrationMode::Manual.initial_status(),
            RegistrationStatus::Pending
        );
    }

    #[test]
    fn price_parsing() {
        assert_eq!("2500".parse::<Price>().unwrap().cents(), 250_000);
        assert_eq!("19.9".parse::<Price>().unwrap().cents(), 1990);
        assert_eq!("0.05".parse::<Price>().unwrap().cents(), 5);
        assert_eq!(".5".parse::<Price>().unwrap().cents(), 50);
        assert!("".parse::<Price>().is_err());
        assert!("-1".parse::<Price>().is_err());
        assert!("1.999".parse::<Price>().is_err());
        assert!("abc".parse::<Price>().is_err());
        assert!("100000000000".parse::<Price>().is_err());
    }

    #[test]
    fn price_json_accepts_numbers_and_strings() {
        let p: Price = serde_json::from_str("2500").unwrap();
        assert_eq!(p.to_string(), "2500.00");
        let p: Price = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"12.50\"");
        let p: Price = serde_json::from_str("0").unwrap();
        assert!(p.is_free());
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }
}
