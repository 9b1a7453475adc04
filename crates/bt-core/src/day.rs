//! Calendar-day boundaries for the day view.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Converts a local date at midnight to UTC.
///
/// Ambiguous midnights (DST fall-back) resolve to the earlier instant. A
/// midnight skipped by a spring-forward gap falls back to 01:00 local.
pub fn local_midnight_to_utc<Tz: TimeZone>(local_date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            local_date
                .and_hms_opt(1, 0, 0)
                .and_then(|one_am| tz.from_local_datetime(&one_am).earliest())
        })
        .map_or_else(
            || naive_as_utc(midnight),
            |dt| dt.with_timezone(&Utc),
        )
}

fn naive_as_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

/// Half-open UTC interval covering `date` in `tz`: midnight to next midnight.
pub fn day_bounds<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (local_midnight_to_utc(date, tz), local_midnight_to_utc(next, tz))
}
