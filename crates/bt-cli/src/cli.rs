//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Baby tracker.
///
/// Logs awake sessions and feedings and shows them on a daily timeline.
#[derive(Debug, Parser)]
#[command(name = "bt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Set up the baby profile.
    Onboard(OnboardArgs),

    /// Show the day view: summary and timeline.
    Today {
        /// Day to show (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage awake sessions.
    #[command(subcommand)]
    Awake(AwakeAction),

    /// Manage feedings.
    #[command(subcommand)]
    Feed(FeedAction),

    /// Show or edit the baby profile.
    #[command(subcommand)]
    Baby(BabyAction),

    /// Show or change settings.
    #[command(subcommand)]
    Settings(SettingsAction),
}

#[derive(Debug, Args)]
pub struct OnboardArgs {
    /// The baby's name.
    #[arg(long)]
    pub name: String,

    /// Birth date (YYYY-MM-DD).
    #[arg(long)]
    pub birth_date: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum AwakeAction {
    /// Log a new awake session.
    Add {
        /// When the baby woke up.
        #[arg(long)]
        start: String,

        /// When the baby fell asleep. Defaults to now.
        #[arg(long, conflicts_with = "ongoing")]
        end: Option<String>,

        /// The baby is still awake.
        #[arg(long)]
        ongoing: bool,
    },

    /// List awake sessions, newest first.
    List,

    /// End an ongoing awake session.
    End {
        /// Session ID.
        id: String,

        /// When the baby fell asleep. Defaults to now.
        #[arg(long)]
        at: Option<String>,
    },

    /// Delete an awake session.
    Delete {
        /// Session ID.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum FeedAction {
    /// Log a new feeding.
    Add {
        /// When the feeding happened. Defaults to now.
        #[arg(long)]
        time: Option<String>,

        /// Bottle amount in ml.
        #[arg(long, conflicts_with = "breastfeeding", required_unless_present = "breastfeeding")]
        amount: Option<f64>,

        /// Breastfeeding duration in minutes.
        #[arg(long)]
        breastfeeding: Option<u32>,
    },

    /// List feedings, newest first.
    List,

    /// Delete a feeding.
    Delete {
        /// Session ID.
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum BabyAction {
    /// Show the baby profile.
    Show,

    /// Change the baby's name or birth date.
    Edit {
        #[arg(long)]
        name: Option<String>,

        /// Birth date (YYYY-MM-DD).
        #[arg(long)]
        birth_date: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show current settings.
    Show,

    /// Change reminder settings.
    Set {
        /// Turn reminders on or off.
        #[arg(long, value_enum)]
        reminders: Option<Toggle>,

        /// Feeding reminder interval in minutes (60-360, steps of 30).
        #[arg(long)]
        feeding_interval: Option<u32>,

        /// Nap reminder interval in minutes (60-240, steps of 30).
        #[arg(long)]
        nap_interval: Option<u32>,
    },

    /// Clear the onboarding flag so `bt onboard` runs again.
    ResetOnboarding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub const fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn feed_add_requires_amount_or_breastfeeding() {
        assert!(Cli::try_parse_from(["bt", "feed", "add"]).is_err());
        assert!(
            Cli::try_parse_from(["bt", "feed", "add", "--amount", "90", "--breastfeeding", "10"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["bt", "feed", "add", "--breastfeeding", "10"]).is_ok());
    }

    #[test]
    fn awake_add_rejects_end_with_ongoing() {
        let result = Cli::try_parse_from([
            "bt", "awake", "add", "--start", "08:00", "--end", "09:00", "--ongoing",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn settings_set_parses_toggle() {
        let cli = Cli::try_parse_from(["bt", "settings", "set", "--reminders", "on"]).unwrap();
        match cli.command {
            Some(Commands::Settings(SettingsAction::Set { reminders, .. })) => {
                assert_eq!(reminders, Some(Toggle::On));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
