//! Awake command for logging and listing awake sessions.

use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::TimeZone;

use bt_core::{AwakeSession, SessionId};
use bt_db::Database;

use super::util::Clock;

/// Logs a new awake session.
///
/// Without `end` and `ongoing`, the session ends now.
pub fn add<W: Write, Tz: TimeZone>(
    writer: &mut W,
    db: &mut Database,
    clock: &Clock<Tz>,
    start: &str,
    end: Option<&str>,
    ongoing: bool,
) -> Result<()> {
    let start_time = clock.parse_when(start).context("invalid --start")?;
    let end_time = if ongoing {
        None
    } else {
        Some(match end {
            Some(end) => clock.parse_when(end).context("invalid --end")?,
            None => clock.now,
        })
    };

    let session = AwakeSession::new(SessionId::generate(), start_time, end_time)?;
    db.insert_awake_session(&session)
        .context("failed to save awake session")?;

    writeln!(writer, "Logged awake session {}", session.id)?;
    Ok(())
}

/// Ends an ongoing awake session.
pub fn end<W: Write, Tz: TimeZone>(
    writer: &mut W,
    db: &mut Database,
    clock: &Clock<Tz>,
    id: &str,
    at: Option<&str>,
) -> Result<()> {
    let id = SessionId::new(id)?;
    let Some(mut session) = db.get_awake_session(&id)? else {
        bail!("awake session not found: {id}");
    };
    if !session.is_ongoing() {
        bail!("awake session {id} has already ended");
    }

    let end_time = match at {
        Some(at) => clock.parse_when(at).context("invalid --at")?,
        None => clock.now,
    };
    session.end_at(end_time)?;
    db.update_awake_session(&session)
        .context("failed to save awake session")?;

    writeln!(writer, "Ended awake session {id}")?;
    Ok(())
}

/// Deletes an awake session.
pub fn delete<W: Write>(writer: &mut W, db: &mut Database, id: &str) -> Result<()> {
    let id = SessionId::new(id)?;
    db.delete_awake_session(&id)
        .context("failed to delete awake session")?;
    writeln!(writer, "Deleted awake session {id}")?;
    Ok(())
}

/// Lists all awake sessions, newest first.
pub fn list<W, Tz>(writer: &mut W, db: &Database, tz: &Tz) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let sessions = db.list_awake_sessions()?;

    if sessions.is_empty() {
        writeln!(writer, "No awake sessions recorded.")?;
        return Ok(());
    }

    writeln!(writer, "{:<36}  {:<16}  {:<5}  LENGTH", "ID", "START", "END")?;
    for session in &sessions {
        let start = session.start_time.with_timezone(tz);
        let end = session
            .end_time
            .map_or_else(|| "-".to_string(), |end| end.with_timezone(tz).format("%H:%M").to_string());
        let length = session
            .duration()
            .map_or_else(|| "Ongoing".to_string(), |d| format!("{} minutes", d.num_minutes()));
        writeln!(
            writer,
            "{:<36}  {:<16}  {end:<5}  {length}",
            session.id.as_str(),
            start.format("%Y-%m-%d %H:%M").to_string(),
        )?;
    }

    Ok(())
}
