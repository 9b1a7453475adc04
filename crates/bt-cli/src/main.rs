use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bt_cli::commands::feed::Feeding;
use bt_cli::commands::util::{Clock, parse_date};
use bt_cli::commands::{awake, baby, feed, onboard, settings, today};
use bt_cli::{AwakeAction, BabyAction, Cli, Commands, Config, FeedAction, SettingsAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(bt_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    config
        .ensure_database_dir()
        .context("failed to create database directory")?;

    let db = bt_db::Database::open(&config.database_path).with_context(|| {
        format!("failed to open {}", config.database_path.display())
    })?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, _config) = open_database(cli.config.as_deref())?;
    let prefs = db.load_settings().context("failed to load settings")?;
    let clock = Clock::system();
    let mut out = io::stdout().lock();

    match command {
        Commands::Onboard(args) => {
            onboard::run(
                &mut out,
                &mut db,
                prefs,
                &clock,
                &args.name,
                args.birth_date.as_deref(),
            )?;
        }
        Commands::Today { date, json } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            today::run(&mut out, &db, prefs, &clock, date, *json)?;
        }
        Commands::Awake(action) => match action {
            AwakeAction::Add {
                start,
                end,
                ongoing,
            } => awake::add(&mut out, &mut db, &clock, start, end.as_deref(), *ongoing)?,
            AwakeAction::List => awake::list(&mut out, &db, &clock.tz)?,
            AwakeAction::End { id, at } => {
                awake::end(&mut out, &mut db, &clock, id, at.as_deref())?;
            }
            AwakeAction::Delete { id } => awake::delete(&mut out, &mut db, id)?,
        },
        Commands::Feed(action) => match action {
            FeedAction::Add {
                time,
                amount,
                breastfeeding,
            } => {
                let feeding = match (amount, breastfeeding) {
                    (Some(amount_ml), None) => Feeding::Bottle {
                        amount_ml: *amount_ml,
                    },
                    (None, Some(minutes)) => Feeding::Breastfeeding { minutes: *minutes },
                    _ => anyhow::bail!("pass exactly one of --amount or --breastfeeding"),
                };
                feed::add(&mut out, &mut db, &clock, time.as_deref(), feeding)?;
            }
            FeedAction::List => feed::list(&mut out, &db, &clock.tz)?,
            FeedAction::Delete { id } => feed::delete(&mut out, &mut db, id)?,
        },
        Commands::Baby(action) => match action {
            BabyAction::Show => baby::show(&mut out, &db, &clock)?,
            BabyAction::Edit { name, birth_date } => baby::edit(
                &mut out,
                &mut db,
                &clock,
                name.as_deref(),
                birth_date.as_deref(),
            )?,
        },
        Commands::Settings(action) => match action {
            SettingsAction::Show => settings::show(&mut out, prefs)?,
            SettingsAction::Set {
                reminders,
                feeding_interval,
                nap_interval,
            } => {
                settings::set(
                    &mut out,
                    &mut db,
                    prefs,
                    *reminders,
                    *feeding_interval,
                    *nap_interval,
                )?;
            }
            SettingsAction::ResetOnboarding => {
                settings::reset_onboarding(&mut out, &mut db, prefs)?;
            }
        },
    }

    Ok(())
}
