//! Baby profile.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{BabyId, ValidationError};

/// The baby being tracked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Baby {
    pub id: BabyId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

impl Baby {
    /// Creates a profile with a trimmed, non-empty name.
    ///
    /// `today` bounds the birth date; future dates are rejected.
    pub fn new(
        id: BabyId,
        name: &str,
        birth_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let mut baby = Self {
            id,
            name: String::new(),
            birth_date: None,
        };
        baby.rename(name)?;
        baby.set_birth_date(birth_date, today)?;
        Ok(baby)
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_birth_date(
        &mut self,
        birth_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        if let Some(date) = birth_date.filter(|date| *date > today) {
            return Err(ValidationError::BirthDateInFuture {
                date: date.to_string(),
            });
        }
        self.birth_date = birth_date;
        Ok(())
    }

    /// Age relative to `today`, or `None` without a birth date.
    pub fn age(&self, today: NaiveDate) -> Option<String> {
        self.birth_date.map(|birth| age_description(birth, today))
    }
}

/// Describes an age in its largest whole unit: years, then months, then days.
pub fn age_description(birth_date: NaiveDate, today: NaiveDate) -> String {
    let mut months = month_index(today) - month_index(birth_date);
    if today.day() < birth_date.day() {
        months -= 1;
    }

    let years = months / 12;
    if years > 0 {
        return plural(i64::from(years), "year");
    }
    if months > 0 {
        return plural(i64::from(months), "month");
    }

    plural((today - birth_date).num_days().max(0), "day")
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + i32::try_from(date.month0()).unwrap_or_default()
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}
