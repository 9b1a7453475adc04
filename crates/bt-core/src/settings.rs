//! Persisted user preferences.
//!
//! Loaded once per invocation and passed by value. Reminder values are kept
//! for display only; nothing schedules them.

use serde::{Deserialize, Serialize};

use crate::timeline::format_hours_minutes;
use crate::types::ValidationError;

/// Allowed reminder interval range, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

pub const FEEDING_INTERVAL_RANGE: IntervalRange = IntervalRange {
    min: 60,
    max: 360,
    step: 30,
};

pub const NAP_INTERVAL_RANGE: IntervalRange = IntervalRange {
    min: 60,
    max: 240,
    step: 30,
};

impl IntervalRange {
    fn check(self, field: &'static str, value: u32) -> Result<(), ValidationError> {
        if value < self.min || value > self.max || (value - self.min) % self.step != 0 {
            return Err(ValidationError::IntervalOutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
                step: self.step,
            });
        }
        Ok(())
    }
}

/// Onboarding and reminder preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub has_completed_onboarding: bool,
    pub enable_reminders: bool,
    pub feeding_reminder_minutes: u32,
    pub nap_reminder_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            has_completed_onboarding: false,
            enable_reminders: false,
            feeding_reminder_minutes: 180,
            nap_reminder_minutes: 120,
        }
    }
}

impl Settings {
    /// Checks both reminder intervals against their ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        FEEDING_INTERVAL_RANGE.check("feeding reminder interval", self.feeding_reminder_minutes)?;
        NAP_INTERVAL_RANGE.check("nap reminder interval", self.nap_reminder_minutes)?;
        Ok(())
    }

    /// Clears the onboarding flag, leaving everything else untouched.
    #[must_use]
    pub const fn reset_onboarding(self) -> Self {
        Self {
            has_completed_onboarding: false,
            ..self
        }
    }
}

/// Formats a reminder interval as `"{h}h {m}m"`.
pub fn format_interval(minutes: u32) -> String {
    format_hours_minutes(i64::from(minutes) * 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reminder_pickers() {
        let settings = Settings::default();
        assert!(!settings.has_completed_onboarding);
        assert!(!settings.enable_reminders);
        assert_eq!(format_interval(settings.feeding_reminder_minutes), "3h 0m");
        assert_eq!(format_interval(settings.nap_reminder_minutes), "2h 0m");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn intervals_must_be_on_step_and_in_range() {
        let ok = Settings {
            feeding_reminder_minutes: 360,
            nap_reminder_minutes: 90,
            ..Settings::default()
        };
        assert!(ok.validate().is_ok());
        assert_eq!(format_interval(90), "1h 30m");

        let too_long = Settings {
            nap_reminder_minutes: 270,
            ..Settings::default()
        };
        assert!(matches!(
            too_long.validate(),
            Err(ValidationError::IntervalOutOfRange {
                field: "nap reminder interval",
                ..
            })
        ));

        let off_step = Settings {
            feeding_reminder_minutes: 75,
            ..Settings::default()
        };
        assert!(off_step.validate().is_err());
    }

    #[test]
    fn reset_onboarding_keeps_reminders() {
        let settings = Settings {
            has_completed_onboarding: true,
            enable_reminders: true,
            feeding_reminder_minutes: 150,
            nap_reminder_minutes: 60,
        };
        let reset = settings.reset_onboarding();
        assert!(!reset.has_completed_onboarding);
        assert!(reset.enable_reminders);
        assert_eq!(reset.feeding_reminder_minutes, 150);
        assert_eq!(reset.nap_reminder_minutes, 60);
    }
}
