use super::commands::areas::AreasCommands;
use super::commands::objectives::{CreateArgs, ListArgs, SubmitArgs};
use super::commands::settings::SettingsCommands;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "objectives-cli")]
#[command(about = "Record, browse and export organizational productivity objectives")]
#[command(version)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in objectives interactively and submit them
    Create(CreateArgs),
    /// Submit objectives given on the command line
    Submit(SubmitArgs),
    /// List stored objectives, optionally filtered and exported
    List(ListArgs),
    /// Browse stored objectives in a full-screen view
    Browse,
    /// Areas and functional groupings
    Areas(AreasCommands),
    /// Application settings management
    Settings(SettingsCommands),
}
