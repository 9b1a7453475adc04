//! Settings command for reminder preferences and onboarding reset.

use std::io::Write;

use anyhow::{Context, Result};

use bt_core::{Settings, format_interval};
use bt_db::Database;

use crate::cli::Toggle;

pub fn show<W: Write>(writer: &mut W, settings: Settings) -> Result<()> {
    let onboarded = if settings.has_completed_onboarding {
        "yes"
    } else {
        "no"
    };
    let reminders = if settings.enable_reminders { "on" } else { "off" };

    writeln!(writer, "Onboarding complete: {onboarded}")?;
    writeln!(writer, "Reminders:           {reminders}")?;
    if settings.enable_reminders {
        writeln!(
            writer,
            "Feeding reminder:    every {}",
            format_interval(settings.feeding_reminder_minutes)
        )?;
        writeln!(
            writer,
            "Nap reminder:        every {}",
            format_interval(settings.nap_reminder_minutes)
        )?;
    }
    Ok(())
}

/// Applies the given changes and saves the result.
pub fn set<W: Write>(
    writer: &mut W,
    db: &mut Database,
    settings: Settings,
    reminders: Option<Toggle>,
    feeding_interval: Option<u32>,
    nap_interval: Option<u32>,
) -> Result<Settings> {
    let updated = Settings {
        enable_reminders: reminders.map_or(settings.enable_reminders, Toggle::enabled),
        feeding_reminder_minutes: feeding_interval.unwrap_or(settings.feeding_reminder_minutes),
        nap_reminder_minutes: nap_interval.unwrap_or(settings.nap_reminder_minutes),
        ..settings
    };
    db.save_settings(&updated)
        .context("failed to save settings")?;
    show(writer, updated)?;
    Ok(updated)
}

pub fn reset_onboarding<W: Write>(
    writer: &mut W,
    db: &mut Database,
    settings: Settings,
) -> Result<Settings> {
    let updated = settings.reset_onboarding();
    db.save_settings(&updated)
        .context("failed to save settings")?;
    writeln!(writer, "Onboarding reset. Run 'bt onboard --name <NAME>' to set up again.")?;
    Ok(updated)
}
