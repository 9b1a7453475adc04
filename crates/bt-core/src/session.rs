//! Awake and feeding sessions recorded by the caregiver.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{SessionId, ValidationError};

/// Upper bound of the breastfeeding duration picker, in minutes.
pub const MAX_BREASTFEEDING_MINUTES: u32 = 120;

/// An interval during which the baby is awake.
///
/// A session without an `end_time` is still ongoing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwakeSession {
    /// Unique identifier (UUID).
    pub id: SessionId,

    /// When the baby woke up.
    pub start_time: DateTime<Utc>,

    /// When the baby fell asleep again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl AwakeSession {
    /// Creates a session, rejecting an end time before the start time.
    pub fn new(
        id: SessionId,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<Self, ValidationError> {
        let session = Self {
            id,
            start_time,
            end_time,
        };
        session.validate()?;
        Ok(session)
    }

    /// Checks that the session does not end before it starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.end_time {
            Some(end) if end < self.start_time => Err(ValidationError::EndBeforeStart {
                start: self.start_time.to_rfc3339(),
                end: end.to_rfc3339(),
            }),
            _ => Ok(()),
        }
    }

    /// Whether the baby is still awake.
    pub const fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }

    /// Length of the session, or `None` while it is ongoing.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Closes an ongoing session at `end_time`.
    pub fn end_at(&mut self, end_time: DateTime<Utc>) -> Result<(), ValidationError> {
        let previous = self.end_time.replace(end_time);
        if let Err(err) = self.validate() {
            self.end_time = previous;
            return Err(err);
        }
        Ok(())
    }
}

/// A single feeding: either a bottle amount or a timed breastfeeding.
///
/// Both quantities are stored; only the one matching `is_breastfeeding` is
/// meaningful.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedingSession {
    /// Unique identifier (UUID).
    pub id: SessionId,

    /// When the feeding happened.
    pub time: DateTime<Utc>,

    /// Breastfeeding rather than bottle.
    pub is_breastfeeding: bool,

    /// Bottle amount in milliliters.
    #[serde(default)]
    pub amount_ml: f64,

    /// Breastfeeding duration in whole minutes.
    #[serde(default)]
    pub breastfeeding_minutes: u32,
}

impl FeedingSession {
    /// Creates a bottle feeding.
    pub fn bottle(
        id: SessionId,
        time: DateTime<Utc>,
        amount_ml: f64,
    ) -> Result<Self, ValidationError> {
        let session = Self {
            id,
            time,
            is_breastfeeding: false,
            amount_ml,
            breastfeeding_minutes: 0,
        };
        session.validate()?;
        Ok(session)
    }

    /// Creates a breastfeeding session.
    pub fn breastfeeding(
        id: SessionId,
        time: DateTime<Utc>,
        minutes: u32,
    ) -> Result<Self, ValidationError> {
        let session = Self {
            id,
            time,
            is_breastfeeding: true,
            amount_ml: 0.0,
            breastfeeding_minutes: minutes,
        };
        session.validate()?;
        Ok(session)
    }

    /// Checks amount and duration bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.amount_ml.is_finite() || self.amount_ml < 0.0 {
            return Err(ValidationError::InvalidAmount {
                value: self.amount_ml,
            });
        }
        if self.breastfeeding_minutes > MAX_BREASTFEEDING_MINUTES {
            return Err(ValidationError::BreastfeedingOutOfRange {
                value: self.breastfeeding_minutes,
                max: MAX_BREASTFEEDING_MINUTES,
            });
        }
        Ok(())
    }
}
