//! Onboard command for creating the baby profile.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::TimeZone;

use bt_core::{Baby, BabyId, Settings};
use bt_db::Database;

use super::util::{Clock, parse_date};

/// Creates the baby profile and marks onboarding complete.
pub fn run<W: Write, Tz: TimeZone>(
    writer: &mut W,
    db: &mut Database,
    settings: Settings,
    clock: &Clock<Tz>,
    name: &str,
    birth_date: Option<&str>,
) -> Result<Settings> {
    if settings.has_completed_onboarding {
        bail!("onboarding already complete; use 'bt baby edit' or 'bt settings reset-onboarding'");
    }

    let birth_date = birth_date.map(parse_date).transpose()?;
    let baby = Baby::new(BabyId::generate(), name, birth_date, clock.today())?;
    let settings = db
        .complete_onboarding(&baby)
        .context("failed to save baby")?;

    writeln!(writer, "Welcome, {}!", baby.name)?;
    writeln!(writer, "Run 'bt today' to see the day view.")?;
    Ok(settings)
}
