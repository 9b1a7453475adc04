//! Core domain logic for the baby tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Records: babies, awake sessions, feedings, and settings
//! - Timeline: merging a day's records into one feed with summary totals
//! - Day bounds: mapping a calendar date to a UTC query range

pub mod baby;
pub mod day;
pub mod session;
pub mod settings;
pub mod timeline;
pub mod types;

pub use baby::{Baby, age_description};
pub use day::day_bounds;
pub use session::{AwakeSession, FeedingSession};
pub use settings::{Settings, format_interval};
pub use timeline::{EventKind, FeedingTotals, Timeline, TimelineEvent, build_timeline};
pub use types::{BabyId, SessionId, ValidationError};
