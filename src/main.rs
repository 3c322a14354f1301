use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use maa_updater::commands;
use maa_updater::commands::update::UpdateOptions;
use maa_updater::core::config::ConfigStore;

#[derive(Parser)]
#[clap(name = "maa-updater")]
#[clap(about = "Updates MAA resource files from MaaResource")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Show debug logging
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the latest resources and copy them into the MAA directory (default)
    Update {
        /// Keep the downloaded archive and extracted files
        #[clap(long)]
        keep_staging: bool,
        /// Ask for the directory and report results in the terminal
        #[clap(long)]
        console: bool,
    },
    /// Check whether newer resources have been published
    Check,
    /// Show or change the saved MAA installation directory
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
    /// Check the configuration and installation layout
    Doctor,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the saved installation directory
    Show,
    /// Save a new installation directory
    Set {
        /// MAA installation directory
        dir: PathBuf,
    },
    /// Forget the saved installation directory
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let command = cli.command.unwrap_or(Commands::Update {
        keep_staging: false,
        console: false,
    });

    let result = match command {
        Commands::Update {
            keep_staging,
            console,
        } => commands::update::update_resources(UpdateOptions {
            keep_staging,
            console,
        })
        .map_err(|e| anyhow::anyhow!(e)),
        Commands::Check => commands::check::check_for_updates()
            .map(|()| 0)
            .map_err(|e| anyhow::anyhow!(e)),
        Commands::Config { command } => {
            let config = ConfigStore::default();
            let outcome = match command {
                ConfigCommands::Show => commands::config::show_config(&config),
                ConfigCommands::Set { dir } => {
                    commands::config::set_installation_dir(&config, &dir)
                }
                ConfigCommands::Clear => commands::config::clear_config(&config),
            };
            outcome.map(|()| 0).map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Doctor => commands::doctor::check_environment()
            .map(|()| 0)
            .map_err(|e| anyhow::anyhow!(e)),
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
