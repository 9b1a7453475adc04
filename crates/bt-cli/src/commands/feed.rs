//! Feed command for logging and listing feedings.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::TimeZone;

use bt_core::{FeedingSession, SessionId};
use bt_db::Database;

use super::util::Clock;

/// What was fed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feeding {
    Bottle { amount_ml: f64 },
    Breastfeeding { minutes: u32 },
}

/// Logs a new feeding, at `time` or now.
pub fn add<W: Write, Tz: TimeZone>(
    writer: &mut W,
    db: &mut Database,
    clock: &Clock<Tz>,
    time: Option<&str>,
    feeding: Feeding,
) -> Result<()> {
    let time = match time {
        Some(time) => clock.parse_when(time).context("invalid --time")?,
        None => clock.now,
    };

    let id = SessionId::generate();
    let session = match feeding {
        Feeding::Bottle { amount_ml } => FeedingSession::bottle(id, time, amount_ml)?,
        Feeding::Breastfeeding { minutes } => FeedingSession::breastfeeding(id, time, minutes)?,
    };
    db.insert_feeding_session(&session)
        .context("failed to save feeding session")?;

    writeln!(writer, "Logged feeding {}", session.id)?;
    Ok(())
}

/// Deletes a feeding.
pub fn delete<W: Write>(writer: &mut W, db: &mut Database, id: &str) -> Result<()> {
    let id = SessionId::new(id)?;
    db.delete_feeding_session(&id)
        .context("failed to delete feeding session")?;
    writeln!(writer, "Deleted feeding {id}")?;
    Ok(())
}

/// Lists all feedings, newest first.
pub fn list<W, Tz>(writer: &mut W, db: &Database, tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let sessions = db.list_feeding_sessions()?;

    if sessions.is_empty() {
        writeln!(writer, "No feedings recorded.")?;
        return Ok(());
    }

    writeln!(writer, "{:<36}  {:<16}  AMOUNT", "ID", "TIME")?;
    for session in &sessions {
        let time = session.time.with_timezone(tz).format("%Y-%m-%d %H:%M");
        let amount = if session.is_breastfeeding {
            format!("{} minutes breastfeeding", session.breastfeeding_minutes)
        } else {
            format!("{:.0} ml", session.amount_ml)
        };
        writeln!(
            writer,
            "{:<36}  {:<16}  {amount}",
            session.id.as_str(),
            time.to_string()
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Utc};
    use insta::assert_snapshot;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn clock() -> Clock<Utc> {
        Clock::fixed(Utc, "UTC", at("2025-03-01T12:00:00Z"))
    }

    #[test]
    fn add_bottle_defaults_to_now() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        add(
            &mut output,
            &mut db,
            &clock(),
            None,
            Feeding::Bottle { amount_ml: 90.0 },
        )
        .unwrap();

        let sessions = db.list_feeding_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].time, clock().now);
        assert!(!sessions[0].is_breastfeeding);
        assert!((sessions[0].amount_ml - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn add_breastfeeding_at_time() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        add(
            &mut output,
            &mut db,
            &clock(),
            Some("07:45"),
            Feeding::Breastfeeding { minutes: 20 },
        )
        .unwrap();

        let session = &db.list_feeding_sessions().unwrap()[0];
        assert_eq!(session.time, at("2025-03-01T07:45:00Z"));
        assert!(session.is_breastfeeding);
        assert_eq!(session.breastfeeding_minutes, 20);
    }

    #[test]
    fn add_rejects_invalid_quantities() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        assert!(
            add(
                &mut output,
                &mut db,
                &clock(),
                None,
                Feeding::Bottle { amount_ml: -5.0 }
            )
            .is_err()
        );
        assert!(
            add(
                &mut output,
                &mut db,
                &clock(),
                None,
                Feeding::Breastfeeding { minutes: 180 }
            )
            .is_err()
        );
        assert!(db.list_feeding_sessions().unwrap().is_empty());
    }

    #[test]
    fn delete_unknown_feeding_fails() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        let err = delete(&mut output, &mut db, "missing").unwrap_err();
        assert_eq!(err.to_string(), "failed to delete feeding session");
    }

    #[test]
    fn list_shows_amount_or_duration() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_feeding_session(
            &FeedingSession::bottle(
                SessionId::new("11111111-1111-4111-8111-111111111111").unwrap(),
                at("2025-03-01T10:00:00Z"),
                120.0,
            )
            .unwrap(),
        )
        .unwrap();
        db.insert_feeding_session(
            &FeedingSession::breastfeeding(
                SessionId::new("22222222-2222-4222-8222-222222222222").unwrap(),
                at("2025-03-01T07:00:00Z"),
                15,
            )
            .unwrap(),
        )
        .unwrap();

        let mut output = Vec::new();
        list(&mut output, &db, &Utc).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        ID                                    TIME              AMOUNT
        11111111-1111-4111-8111-111111111111  2025-03-01 10:00  120 ml
        22222222-2222-4222-8222-222222222222  2025-03-01 07:00  15 minutes breastfeeding
        ");
    }
}
