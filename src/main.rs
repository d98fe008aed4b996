use anyhow::Result;
use clap::Parser;
use log::{debug, info};

use objectives_cli::cli::Cli;
use objectives_cli::cli::app::Commands;
use objectives_cli::cli::commands::{AreasSubcommands, SettingsSubcommands};
use objectives_cli::commands::{areas, objectives, settings};
use objectives_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger to file (truncate on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("objectives-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    info!("Starting objectives-cli");

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Create(args) => objectives::create_command(&config, args).await,
        Commands::Submit(args) => objectives::submit_command(&config, args).await,
        Commands::List(args) => objectives::list_command(&config, args).await,
        Commands::Browse => objectives::browse_command(&config).await,
        Commands::Areas(areas_cmd) => match areas_cmd.command {
            AreasSubcommands::List => areas::list_command(&config).await,
            AreasSubcommands::Add { area, grouping } => {
                areas::add_command(&config, area, grouping).await
            }
        },
        Commands::Settings(settings_cmd) => match settings_cmd.command {
            SettingsSubcommands::Show => settings::show_command(&config).await,
            SettingsSubcommands::Get { name } => settings::get_command(&config, name).await,
            SettingsSubcommands::Set { name, value } => {
                settings::set_command(config, name, value).await
            }
            SettingsSubcommands::Reset { name } => settings::reset_command(config, name).await,
            SettingsSubcommands::ResetAll { force } => {
                settings::reset_all_command(config, force).await
            }
        },
    }
}
