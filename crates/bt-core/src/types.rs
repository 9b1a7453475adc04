//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// An awake session ended before it started.
    #[error("end time {end} is before start time {start}")]
    EndBeforeStart { start: String, end: String },

    /// A bottle amount was negative or not a number.
    #[error("amount must be a non-negative number of ml, got {value}")]
    InvalidAmount { value: f64 },

    /// A breastfeeding duration was outside the accepted range.
    #[error("breastfeeding duration must be between 0 and {max} minutes, got {value}")]
    BreastfeedingOutOfRange { value: u32, max: u32 },

    /// A birth date was set in the future.
    #[error("birth date {date} is in the future")]
    BirthDateInFuture { date: String },

    /// A reminder interval was outside its slider range or off-step.
    #[error("{field} must be between {min} and {max} minutes in steps of {step}, got {value}")]
    IntervalOutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
        step: u32,
    },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Generates a fresh random ID.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated baby identifier.
    BabyId, "baby ID"
);

define_string_id!(
    /// A validated session identifier.
    ///
    /// Shared by awake and feeding sessions. Uniqueness is enforced by the
    /// store's primary keys, not here.
    SessionId, "session ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_rejects_empty() {
        let err = SessionId::new("").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Empty {
                field: "session ID"
            }
        );
        assert_eq!(err.to_string(), "session ID cannot be empty");
    }

    #[test]
    fn generated_ids_are_distinct_uuids() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn baby_id_deserialization_validates() {
        let parsed: Result<BabyId, _> = serde_json::from_str(r#""""#);
        assert!(parsed.is_err());

        let parsed: BabyId = serde_json::from_str(r#""baby-1""#).unwrap();
        assert_eq!(parsed.as_str(), "baby-1");
    }

    #[test]
    fn interval_error_message() {
        let err = ValidationError::IntervalOutOfRange {
            field: "nap reminder interval",
            value: 45,
            min: 60,
            max: 240,
            step: 30,
        };
        assert_eq!(
            err.to_string(),
            "nap reminder interval must be between 60 and 240 minutes in steps of 30, got 45"
        );
    }
}
