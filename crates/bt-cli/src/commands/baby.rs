//! Baby command for showing and editing the profile.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone};

use bt_db::Database;

use super::util::{Clock, parse_date};

pub fn show<W: Write, Tz: TimeZone>(writer: &mut W, db: &Database, clock: &Clock<Tz>) -> Result<()> {
    let Some(baby) = db.first_baby()? else {
        writeln!(writer, "No baby profile yet. Run 'bt onboard --name <NAME>' first.")?;
        return Ok(());
    };

    writeln!(writer, "{}", baby.name)?;
    if let Some(birth_date) = baby.birth_date {
        writeln!(writer, "Born {}", birth_date.format("%B %-d, %Y"))?;
    }
    if let Some(age) = baby.age(clock.today()) {
        writeln!(writer, "Age: {age}")?;
    }
    Ok(())
}

/// Updates the name and/or birth date of the profile.
pub fn edit<W: Write, Tz: TimeZone>(
    writer: &mut W,
    db: &mut Database,
    clock: &Clock<Tz>,
    name: Option<&str>,
    birth_date: Option<&str>,
) -> Result<()> {
    let mut baby = db
        .first_baby()?
        .context("no baby profile yet, run 'bt onboard' first")?;

    if let Some(name) = name {
        baby.rename(name)?;
    }
    if let Some(birth_date) = birth_date {
        let date: NaiveDate = parse_date(birth_date)?;
        baby.set_birth_date(Some(date), clock.today())?;
    }

    db.update_baby(&baby).context("failed to save baby info")?;
    writeln!(writer, "Saved baby info for {}", baby.name)?;
    Ok(())
}
