//! Baby tracker CLI library.
//!
//! This crate provides the CLI interface for the baby tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{AwakeAction, BabyAction, Cli, Commands, FeedAction, OnboardArgs, SettingsAction, Toggle};
pub use config::Config;
