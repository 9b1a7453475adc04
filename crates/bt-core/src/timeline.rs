//! Daily timeline aggregation.
//!
//! Merges a day's awake sessions and feedings into a single feed, newest
//! first, and computes the two summary figures shown above it.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{AwakeSession, FeedingSession};

/// Which record an event was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Awake,
    Feeding,
}

impl EventKind {
    /// Lowercase name used in output.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Awake => "awake",
            Self::Feeding => "feeding",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the day view.
///
/// At most one of `duration_seconds` and `amount_ml` is set. An ongoing awake
/// session has neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub time: DateTime<Utc>,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_ml: Option<f64>,
}

impl TimelineEvent {
    fn from_awake(session: &AwakeSession) -> Self {
        Self {
            id: session.id.to_string(),
            time: session.start_time,
            kind: EventKind::Awake,
            duration_seconds: session.duration().map(|d| d.num_seconds()),
            amount_ml: None,
        }
    }

    fn from_feeding(session: &FeedingSession) -> Self {
        let (duration_seconds, amount_ml) = if session.is_breastfeeding {
            (Some(i64::from(session.breastfeeding_minutes) * 60), None)
        } else {
            (None, Some(session.amount_ml))
        };
        Self {
            id: session.id.to_string(),
            time: session.time,
            kind: EventKind::Feeding,
            duration_seconds,
            amount_ml,
        }
    }

    /// Short secondary text for the row: `"N min"`, `"N ml"`, or `"ongoing"`.
    #[allow(clippy::cast_precision_loss)]
    pub fn detail(&self) -> String {
        match (self.duration_seconds, self.amount_ml) {
            (Some(seconds), _) => format!("{:.0} min", seconds as f64 / 60.0),
            (None, Some(amount)) => format!("{amount:.0} ml"),
            (None, None) if self.kind == EventKind::Awake => "ongoing".to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Running feeding totals for a day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeedingTotals {
    /// Sum of bottle amounts.
    pub total_ml: f64,
    /// Sum of breastfeeding durations.
    pub breastfeeding_minutes: u64,
}

impl FeedingTotals {
    /// Summary string for the day.
    ///
    /// Reports milliliters whenever any bottle amount was logged, and only
    /// falls back to breastfeeding minutes when there is none. Breastfeeding
    /// time is dropped from the summary on mixed days.
    pub fn summary(&self) -> String {
        if self.total_ml > 0.0 {
            format!("{:.0} ml", self.total_ml)
        } else {
            format!("{} min breastfeeding", self.breastfeeding_minutes)
        }
    }
}

/// Output of [`build_timeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// Events sorted newest first.
    pub events: Vec<TimelineEvent>,
    /// Total length of finished awake sessions.
    pub total_awake: TimeDelta,
    pub feeding: FeedingTotals,
}

impl Timeline {
    /// Total awake time as `"{h}h {m}m"`.
    pub fn total_awake_summary(&self) -> String {
        format_hours_minutes(self.total_awake.num_seconds())
    }

    /// Total feeding amount, see [`FeedingTotals::summary`].
    pub fn total_feeding_summary(&self) -> String {
        self.feeding.summary()
    }
}

/// Formats whole seconds as `"{h}h {m}m"`, truncating leftover seconds.
pub fn format_hours_minutes(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = seconds / 60 % 60;
    format!("{hours}h {minutes}m")
}

/// Merges awake sessions and feedings into one timeline.
///
/// Inputs may be in any order. Events sharing a timestamp keep their input
/// order, awake events first.
pub fn build_timeline(
    awake_sessions: &[AwakeSession],
    feeding_sessions: &[FeedingSession],
) -> Timeline {
    let mut events: Vec<TimelineEvent> = awake_sessions
        .iter()
        .map(TimelineEvent::from_awake)
        .chain(feeding_sessions.iter().map(TimelineEvent::from_feeding))
        .collect();
    events.sort_by(|a, b| b.time.cmp(&a.time));

    let total_awake = awake_sessions
        .iter()
        .filter_map(AwakeSession::duration)
        .fold(TimeDelta::zero(), |acc, d| acc + d);

    let feeding = feeding_sessions
        .iter()
        .fold(FeedingTotals::default(), |mut totals, session| {
            if session.is_breastfeeding {
                totals.breastfeeding_minutes += u64::from(session.breastfeeding_minutes);
            } else {
                totals.total_ml += session.amount_ml;
            }
            totals
        });

    tracing::trace!(
        awake = awake_sessions.len(),
        feeding = feeding_sessions.len(),
        "built timeline"
    );

    Timeline {
        events,
        total_awake,
        feeding,
    }
}
