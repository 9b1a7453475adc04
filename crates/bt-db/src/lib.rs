//! Storage layer for the baby tracker.
//!
//! Provides persistence for babies, awake sessions, feedings, and the
//! settings record using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Each CLI invocation opens its own connection; nothing here shares one across threads.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 format with millisecond precision
//! and a `Z` suffix (e.g., `2025-03-01T08:00:00.000Z`). Because every value has
//! the same width and zone, lexicographic ordering matches chronological
//! ordering, which the range queries rely on.
//!
//! Birth dates are stored as `YYYY-MM-DD`.
//!
//! ## Settings
//!
//! The `settings` table holds at most one row (`id = 1`). A missing row means
//! defaults.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;

use bt_core::{AwakeSession, Baby, BabyId, FeedingSession, SessionId, Settings, ValidationError};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A record failed validation before being written.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for {record_id}: {timestamp}")]
    TimestampParse {
        record_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row no longer satisfies the record invariants.
    #[error("invalid record {record_id}: {message}")]
    InvalidRecord { record_id: String, message: String },
    /// No record with the given ID exists.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS babies (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                birth_date TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_babies_name ON babies(name);

            -- end_time NULL means the baby is still awake
            CREATE TABLE IF NOT EXISTS awake_sessions (
                id TEXT PRIMARY KEY,
                start_time TEXT NOT NULL,
                end_time TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_awake_sessions_start ON awake_sessions(start_time);

            CREATE TABLE IF NOT EXISTS feeding_sessions (
                id TEXT PRIMARY KEY,
                time TEXT NOT NULL,
                is_breastfeeding INTEGER NOT NULL,
                amount_ml REAL NOT NULL DEFAULT 0,
                breastfeeding_minutes INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_feeding_sessions_time ON feeding_sessions(time);

            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                has_completed_onboarding INTEGER NOT NULL,
                enable_reminders INTEGER NOT NULL,
                feeding_reminder_minutes INTEGER NOT NULL,
                nap_reminder_minutes INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    // ========== Babies ==========

    /// Inserts a new baby profile.
    pub fn insert_baby(&mut self, baby: &Baby) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO babies (id, name, birth_date) VALUES (?, ?, ?)",
            params![
                baby.id.as_str(),
                baby.name,
                baby.birth_date.map(format_date)
            ],
        )?;
        tracing::debug!(id = %baby.id, "inserted baby");
        Ok(())
    }

    /// Overwrites the name and birth date of an existing baby.
    pub fn update_baby(&mut self, baby: &Baby) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "UPDATE babies SET name = ?, birth_date = ? WHERE id = ?",
            params![
                baby.name,
                baby.birth_date.map(format_date),
                baby.id.as_str()
            ],
        )?;
        ensure_found(changed, "baby", baby.id.as_str())
    }

    /// Lists babies ordered by name.
    pub fn list_babies(&self) -> Result<Vec<Baby>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, birth_date FROM babies ORDER BY name ASC, id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;
        let mut babies = Vec::new();
        for row in rows {
            let (id, name, birth_date) = row?;
            babies.push(baby_from_columns(id, name, birth_date)?);
        }
        Ok(babies)
    }

    /// Returns the first baby by name, which is the profile the app shows.
    pub fn first_baby(&self) -> Result<Option<Baby>, DbError> {
        Ok(self.list_babies()?.into_iter().next())
    }

    // ========== Awake Sessions ==========

    /// Inserts an awake session after validating it.
    pub fn insert_awake_session(&mut self, session: &AwakeSession) -> Result<(), DbError> {
        session.validate()?;
        self.conn.execute(
            "INSERT INTO awake_sessions (id, start_time, end_time) VALUES (?, ?, ?)",
            params![
                session.id.as_str(),
                format_timestamp(session.start_time),
                session.end_time.map(format_timestamp)
            ],
        )?;
        tracing::debug!(id = %session.id, ongoing = session.is_ongoing(), "inserted awake session");
        Ok(())
    }

    /// Overwrites the times of an existing awake session.
    pub fn update_awake_session(&mut self, session: &AwakeSession) -> Result<(), DbError> {
        session.validate()?;
        let changed = self.conn.execute(
            "UPDATE awake_sessions SET start_time = ?, end_time = ? WHERE id = ?",
            params![
                format_timestamp(session.start_time),
                session.end_time.map(format_timestamp),
                session.id.as_str()
            ],
        )?;
        ensure_found(changed, "awake session", session.id.as_str())
    }

    /// Deletes an awake session by ID.
    pub fn delete_awake_session(&mut self, id: &SessionId) -> Result<(), DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM awake_sessions WHERE id = ?", [id.as_str()])?;
        ensure_found(changed, "awake session", id.as_str())
    }

    /// Fetches a single awake session.
    pub fn get_awake_session(&self, id: &SessionId) -> Result<Option<AwakeSession>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, start_time, end_time FROM awake_sessions WHERE id = ?",
                [id.as_str()],
                awake_columns,
            )
            .optional()?;
        row.map(|(id, start, end)| awake_from_columns(id, start, end))
            .transpose()
    }

    /// Lists all awake sessions, newest first.
    pub fn list_awake_sessions(&self) -> Result<Vec<AwakeSession>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, start_time, end_time
            FROM awake_sessions
            ORDER BY start_time DESC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], awake_columns)?;
        let mut sessions = Vec::new();
        for row in rows {
            let (id, start, end) = row?;
            sessions.push(awake_from_columns(id, start, end)?);
        }
        Ok(sessions)
    }

    /// Lists awake sessions that started within a time range, oldest first.
    ///
    /// The range is inclusive of `start` and exclusive of `end`.
    pub fn list_awake_sessions_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AwakeSession>, DbError> {
        if end <= start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "
            SELECT id, start_time, end_time
            FROM awake_sessions
            WHERE start_time >= ? AND start_time < ?
            ORDER BY start_time ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([format_timestamp(start), format_timestamp(end)], awake_columns)?;
        let mut sessions = Vec::new();
        for row in rows {
            let (id, start, end) = row?;
            sessions.push(awake_from_columns(id, start, end)?);
        }
        Ok(sessions)
    }

    // ========== Feeding Sessions ==========

    /// Inserts a feeding after validating it.
    pub fn insert_feeding_session(&mut self, session: &FeedingSession) -> Result<(), DbError> {
        session.validate()?;
        self.conn.execute(
            "
            INSERT INTO feeding_sessions
            (id, time, is_breastfeeding, amount_ml, breastfeeding_minutes)
            VALUES (?, ?, ?, ?, ?)
            ",
            params![
                session.id.as_str(),
                format_timestamp(session.time),
                session.is_breastfeeding,
                session.amount_ml,
                session.breastfeeding_minutes,
            ],
        )?;
        tracing::debug!(
            id = %session.id,
            breastfeeding = session.is_breastfeeding,
            "inserted feeding session"
        );
        Ok(())
    }

    /// Deletes a feeding by ID.
    pub fn delete_feeding_session(&mut self, id: &SessionId) -> Result<(), DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM feeding_sessions WHERE id = ?", [id.as_str()])?;
        ensure_found(changed, "feeding session", id.as_str())
    }

    /// Lists all feedings, newest first.
    pub fn list_feeding_sessions(&self) -> Result<Vec<FeedingSession>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, time, is_breastfeeding, amount_ml, breastfeeding_minutes
            FROM feeding_sessions
            ORDER BY time DESC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], feeding_columns)?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(feeding_from_columns(row?)?);
        }
        Ok(sessions)
    }

    /// Lists feedings within a time range, oldest first.
    ///
    /// The range is inclusive of `start` and exclusive of `end`.
    pub fn list_feeding_sessions_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FeedingSession>, DbError> {
        if end <= start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "
            SELECT id, time, is_breastfeeding, amount_ml, breastfeeding_minutes
            FROM feeding_sessions
            WHERE time >= ? AND time < ?
            ORDER BY time ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map(
            [format_timestamp(start), format_timestamp(end)],
            feeding_columns,
        )?;
        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(feeding_from_columns(row?)?);
        }
        Ok(sessions)
    }

    // ========== Settings ==========

    /// Loads the settings record, falling back to defaults.
    pub fn load_settings(&self) -> Result<Settings, DbError> {
        let settings = self
            .conn
            .query_row(
                "
                SELECT has_completed_onboarding, enable_reminders,
                       feeding_reminder_minutes, nap_reminder_minutes
                FROM settings
                WHERE id = 1
                ",
                [],
                |row| {
                    Ok(Settings {
                        has_completed_onboarding: row.get(0)?,
                        enable_reminders: row.get(1)?,
                        feeding_reminder_minutes: row.get(2)?,
                        nap_reminder_minutes: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(settings.unwrap_or_default())
    }

    /// Writes the settings record, replacing any previous values.
    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), DbError> {
        settings.validate()?;
        self.conn.execute(
            "
            INSERT INTO settings
            (id, has_completed_onboarding, enable_reminders, feeding_reminder_minutes, nap_reminder_minutes)
            VALUES (1, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                has_completed_onboarding = excluded.has_completed_onboarding,
                enable_reminders = excluded.enable_reminders,
                feeding_reminder_minutes = excluded.feeding_reminder_minutes,
                nap_reminder_minutes = excluded.nap_reminder_minutes
            ",
            params![
                settings.has_completed_onboarding,
                settings.enable_reminders,
                settings.feeding_reminder_minutes,
                settings.nap_reminder_minutes,
            ],
        )?;
        tracing::debug!(?settings, "saved settings");
        Ok(())
    }

    /// Creates the baby profile and marks onboarding complete atomically.
    pub fn complete_onboarding(&mut self, baby: &Baby) -> Result<Settings, DbError> {
        let settings = Settings {
            has_completed_onboarding: true,
            ..self.load_settings()?
        };
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO babies (id, name, birth_date) VALUES (?, ?, ?)",
            params![
                baby.id.as_str(),
                baby.name,
                baby.birth_date.map(format_date)
            ],
        )?;
        tx.execute(
            "
            INSERT INTO settings
            (id, has_completed_onboarding, enable_reminders, feeding_reminder_minutes, nap_reminder_minutes)
            VALUES (1, 1, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET has_completed_onboarding = 1
            ",
            params![
                settings.enable_reminders,
                settings.feeding_reminder_minutes,
                settings.nap_reminder_minutes,
            ],
        )?;
        tx.commit()?;
        tracing::info!(id = %baby.id, "onboarding complete");
        Ok(settings)
    }
}

type AwakeColumns = (String, String, Option<String>);
type FeedingColumns = (String, String, bool, f64, u32);

fn awake_columns(row: &Row<'_>) -> rusqlite::Result<AwakeColumns> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn feeding_columns(row: &Row<'_>) -> rusqlite::Result<FeedingColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn awake_from_columns(
    id: String,
    start_time: String,
    end_time: Option<String>,
) -> Result<AwakeSession, DbError> {
    let start = parse_timestamp(&start_time, &id)?;
    let end = end_time
        .map(|end| parse_timestamp(&end, &id))
        .transpose()?;
    let session_id = session_id(&id)?;
    AwakeSession::new(session_id, start, end).map_err(|err| invalid_record(&id, &err))
}

fn feeding_from_columns(columns: FeedingColumns) -> Result<FeedingSession, DbError> {
    let (id, time, is_breastfeeding, amount_ml, breastfeeding_minutes) = columns;
    let session = FeedingSession {
        id: session_id(&id)?,
        time: parse_timestamp(&time, &id)?,
        is_breastfeeding,
        amount_ml,
        breastfeeding_minutes,
    };
    session.validate().map_err(|err| invalid_record(&id, &err))?;
    Ok(session)
}

fn baby_from_columns(
    id: String,
    name: String,
    birth_date: Option<String>,
) -> Result<Baby, DbError> {
    let birth_date = birth_date
        .map(|date| {
            NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|source| {
                DbError::TimestampParse {
                    record_id: id.clone(),
                    timestamp: date.clone(),
                    source,
                }
            })
        })
        .transpose()?;
    let baby_id = BabyId::new(id.clone()).map_err(|err| invalid_record(&id, &err))?;
    Ok(Baby {
        id: baby_id,
        name,
        birth_date,
    })
}

fn session_id(id: &str) -> Result<SessionId, DbError> {
    SessionId::new(id).map_err(|err| invalid_record(id, &err))
}

fn invalid_record(id: &str, err: &ValidationError) -> DbError {
    DbError::InvalidRecord {
        record_id: id.to_string(),
        message: err.to_string(),
    }
}

fn ensure_found(changed: usize, kind: &'static str, id: &str) -> Result<(), DbError> {
    if changed == 0 {
        return Err(DbError::NotFound {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

fn parse_timestamp(timestamp: &str, record_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            record_id: record_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
