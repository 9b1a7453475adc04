//! Today command: the day view.
//!
//! Fetches one calendar day of awake sessions and feedings, runs them through
//! the timeline aggregator, and renders the summary and feed either as text or
//! as JSON.

use std::fmt::{Display, Write as _};
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use bt_core::{Settings, Timeline, TimelineEvent, build_timeline, day_bounds};
use bt_db::Database;

use super::util::Clock;

/// Computed day view data.
#[derive(Debug)]
pub struct DayView {
    pub generated_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub timezone: String,
    pub baby_name: Option<String>,
    pub baby_age: Option<String>,
    pub timeline: Timeline,
}

/// Loads the day's records and aggregates them.
pub fn generate_day_view<Tz: TimeZone>(
    db: &Database,
    date: NaiveDate,
    clock: &Clock<Tz>,
) -> Result<DayView> {
    let (start, end) = day_bounds(date, &clock.tz);
    let awake = db.list_awake_sessions_in_range(start, end)?;
    let feeding = db.list_feeding_sessions_in_range(start, end)?;
    tracing::debug!(
        %date,
        %start,
        %end,
        awake = awake.len(),
        feeding = feeding.len(),
        "loaded day"
    );

    let baby = db.first_baby()?;
    let today = clock.today();

    Ok(DayView {
        generated_at: clock.now,
        date,
        timezone: clock.timezone_name.clone(),
        baby_age: baby.as_ref().and_then(|b| b.age(today)),
        baby_name: baby.map(|b| b.name),
        timeline: build_timeline(&awake, &feeding),
    })
}

/// Formats the human-readable day view.
pub fn format_day_view<Tz>(view: &DayView, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut output = String::new();

    writeln!(output, "DAY VIEW: {}", view.date.format("%A, %b %-d, %Y")).unwrap();
    match (&view.baby_name, &view.baby_age) {
        (Some(name), Some(age)) => writeln!(output, "Baby: {name} ({age})").unwrap(),
        (Some(name), None) => writeln!(output, "Baby: {name}").unwrap(),
        _ => {}
    }

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(
        output,
        "Total awake time:      {}",
        view.timeline.total_awake_summary()
    )
    .unwrap();
    writeln!(
        output,
        "Total feeding amount:  {}",
        view.timeline.total_feeding_summary()
    )
    .unwrap();

    writeln!(output).unwrap();
    writeln!(output, "TIMELINE").unwrap();
    writeln!(output, "────────").unwrap();

    if view.timeline.events.is_empty() {
        writeln!(output, "No events recorded this day.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'bt awake add' or 'bt feed add' to log one.").unwrap();
        return output;
    }

    for event in &view.timeline.events {
        let time = event.time.with_timezone(tz).format("%H:%M");
        let line = format!("{time}  {:<8} {}", event.kind.as_str(), event.detail());
        writeln!(output, "{}", line.trim_end()).unwrap();
    }

    output
}

#[derive(Serialize)]
struct DayViewJson<'a> {
    generated_at: String,
    date: String,
    timezone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    baby: Option<&'a str>,
    total_awake: String,
    total_awake_seconds: i64,
    total_feeding: String,
    total_feeding_ml: f64,
    total_breastfeeding_minutes: u64,
    events: &'a [TimelineEvent],
}

/// Formats the day view as pretty-printed JSON.
pub fn format_day_view_json(view: &DayView) -> Result<String> {
    let json = DayViewJson {
        generated_at: view.generated_at.to_rfc3339(),
        date: view.date.to_string(),
        timezone: &view.timezone,
        baby: view.baby_name.as_deref(),
        total_awake: view.timeline.total_awake_summary(),
        total_awake_seconds: view.timeline.total_awake.num_seconds(),
        total_feeding: view.timeline.total_feeding_summary(),
        total_feeding_ml: view.timeline.feeding.total_ml,
        total_breastfeeding_minutes: view.timeline.feeding.breastfeeding_minutes,
        events: &view.timeline.events,
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

/// Runs the today command.
///
/// Before onboarding is complete only a welcome hint is printed.
pub fn run<W, Tz>(
    writer: &mut W,
    db: &Database,
    settings: Settings,
    clock: &Clock<Tz>,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !settings.has_completed_onboarding {
        writeln!(writer, "Welcome to BabyTracker!")?;
        writeln!(writer, "Run 'bt onboard --name <NAME>' to get started.")?;
        return Ok(());
    }

    let date = date.unwrap_or_else(|| clock.today());
    let view = generate_day_view(db, date, clock)?;

    if json {
        writeln!(writer, "{}", format_day_view_json(&view)?)?;
    } else {
        write!(writer, "{}", format_day_view(&view, &clock.tz))?;
    }

    Ok(())
}
