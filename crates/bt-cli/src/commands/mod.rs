//! CLI subcommand implementations.

pub mod awake;
pub mod baby;
pub mod feed;
pub mod onboard;
pub mod settings;
pub mod today;
pub mod util;
