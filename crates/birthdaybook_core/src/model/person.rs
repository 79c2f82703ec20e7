//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical record tracked by the roster.
//! - Enforce structural constraints before anything reaches a store.
//!
//! # Invariants
//! - `id` is assigned by the authoritative store and never by core.
//! - `name` is non-empty after trimming.
//! - `(day, month)` is a real calendar date; Feb 29 is accepted.
//!
//! # See also
//! - crate::countdown for the leap-day policy applied to Feb 29.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the authoritative store.
pub type PersonId = Uuid;

/// Validation failures for person records and create requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonValidationError {
    /// The nil UUID is reserved and never identifies a person.
    NilId,
    /// Name is empty or whitespace only.
    EmptyName,
    /// Month is outside 1..=12.
    InvalidMonth(u8),
    /// Day is outside the valid range for the given month.
    InvalidDay { day: u8, month: u8 },
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "person id must not be nil"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidMonth(month) => write!(f, "month ({month}) must be within 1..=12"),
            Self::InvalidDay { day, month } => write!(
                f,
                "day ({day}) must be within 1..={} for month {month}",
                max_day_of_month(*month)
            ),
        }
    }
}

impl Error for PersonValidationError {}

/// Create request sent to the authoritative store.
///
/// Carries everything except the id, which the store assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewPersonWire")]
pub struct NewPerson {
    pub name: String,
    pub day: u8,
    pub month: u8,
}

impl NewPerson {
    /// Builds a validated create request.
    ///
    /// The name is trimmed before it is stored.
    pub fn new(
        name: impl Into<String>,
        day: u8,
        month: u8,
    ) -> Result<Self, PersonValidationError> {
        let draft = Self {
            name: name.into().trim().to_string(),
            day,
            month,
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Checks name and birthday constraints.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        validate_fields(&self.name, self.day, self.month)
    }

    /// Attaches a store-assigned id, producing the canonical record.
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            name: self.name,
            day: self.day,
            month: self.month,
        }
    }
}

/// Canonical person record as acknowledged by the authoritative store.
///
/// Updates always replace the entire record; there is no partial merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersonWire")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    /// Day of month, 1..=31.
    pub day: u8,
    /// Month of year, 1..=12.
    pub month: u8,
}

impl Person {
    /// Builds a validated record with a store-assigned id.
    pub fn with_id(
        id: PersonId,
        name: impl Into<String>,
        day: u8,
        month: u8,
    ) -> Result<Self, PersonValidationError> {
        let person = Self {
            id,
            name: name.into().trim().to_string(),
            day,
            month,
        };
        person.validate()?;
        Ok(person)
    }

    /// Checks id, name and birthday constraints.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if self.id.is_nil() {
            return Err(PersonValidationError::NilId);
        }
        validate_fields(&self.name, self.day, self.month)
    }

    /// Returns whether this is a Feb 29 birthday.
    pub fn is_leap_day(&self) -> bool {
        self.day == 29 && self.month == 2
    }
}

/// Largest day accepted for `month`, counting Feb 29 as valid.
///
/// Returns `0` for months outside 1..=12.
pub fn max_day_of_month(month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => 29,
        _ => 0,
    }
}

fn validate_fields(name: &str, day: u8, month: u8) -> Result<(), PersonValidationError> {
    if name.trim().is_empty() {
        return Err(PersonValidationError::EmptyName);
    }
    if !(1..=12).contains(&month) {
        return Err(PersonValidationError::InvalidMonth(month));
    }
    if day == 0 || day > max_day_of_month(month) {
        return Err(PersonValidationError::InvalidDay { day, month });
    }
    Ok(())
}

#[derive(Deserialize)]
struct PersonWire {
    id: PersonId,
    name: String,
    day: u8,
    month: u8,
}

impl TryFrom<PersonWire> for Person {
    type Error = PersonValidationError;

    fn try_from(wire: PersonWire) -> Result<Self, Self::Error> {
        Self::with_id(wire.id, wire.name, wire.day, wire.month)
    }
}

#[derive(Deserialize)]
struct NewPersonWire {
    name: String,
    day: u8,
    month: u8,
}

impl TryFrom<NewPersonWire> for NewPerson {
    type Error = PersonValidationError;

    fn try_from(wire: NewPersonWire) -> Result<Self, Self::Error> {
        Self::new(wire.name, wire.day, wire.month)
    }
}

#[cfg(test)]
mod tests {
    use super::{max_day_of_month, NewPerson, Person, PersonValidationError};
    use uuid::Uuid;

    #[test]
    fn february_accepts_leap_day() {
        assert_eq!(max_day_of_month(2), 29);
        assert!(NewPerson::new("Leap", 29, 2).is_ok());
    }

    #[test]
    fn rejects_day_past_end_of_month() {
        let err = NewPerson::new("April", 31, 4).unwrap_err();
        assert_eq!(err, PersonValidationError::InvalidDay { day: 31, month: 4 });
        assert!(err.to_string().contains("1..=30"));
    }

    #[test]
    fn trims_name_and_rejects_blank() {
        let draft = NewPerson::new("  Ada ", 10, 12).unwrap();
        assert_eq!(draft.name, "Ada");

        let err = NewPerson::new("   ", 10, 12).unwrap_err();
        assert_eq!(err, PersonValidationError::EmptyName);
    }

    #[test]
    fn into_person_keeps_fields() {
        let id = Uuid::new_v4();
        let person = NewPerson::new("Ada", 10, 12).unwrap().into_person(id);
        assert_eq!(person.id, id);
        assert_eq!((person.day, person.month), (10, 12));
        assert!(!person.is_leap_day());
    }

    #[test]
    fn with_id_rejects_nil_id() {
        let err = Person::with_id(Uuid::nil(), "Ada", 1, 1).unwrap_err();
        assert_eq!(err, PersonValidationError::NilId);
    }
}
