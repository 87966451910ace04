//! watchdog - SKALE containers watchdog CLI

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use watchdog_cli::commands;
use watchdog_config::GlobalConfig;
use watchdog_core::{ContainerAdmin, ContainerFilter};
use watchdog_engine::RemoveOptions;

#[derive(Parser)]
#[command(name = "watchdog")]
#[command(author, version, about = "SKALE containers watchdog", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the engine socket or URL from the config
    #[arg(long, global = true)]
    socket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List SKALE containers
    Ls {
        /// Include stopped containers
        #[arg(short, long)]
        all: bool,
        /// Container group to list
        #[arg(long, default_value = "skale", value_parser = ["skale", "schain", "core"])]
        filter: String,
        /// Print the full engine records as JSON
        #[arg(long)]
        raw: bool,
        /// Print the summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the status of a container
    Info {
        /// Container name or ID
        container: String,
        /// Print status and inspection data as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a container, tolerating its absence
    Rm {
        /// Container name or ID
        container: String,
        /// Kill the container first if it is running
        #[arg(short, long)]
        force: bool,
        /// Also remove anonymous volumes
        #[arg(long)]
        volumes: bool,
        /// Remove the link instead of the container
        #[arg(long)]
        link: bool,
    },

    /// Manage data volumes
    Volume {
        #[command(subcommand)]
        command: VolumeCommands,
    },

    /// Show global configuration
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum VolumeCommands {
    /// Check whether a volume exists
    Exists {
        /// Volume name
        name: String,
    },

    /// Create a data volume with the configured driver
    Create {
        /// Volume name
        name: String,
        /// Size passed to non-local volume drivers
        #[arg(long)]
        size: Option<u64>,
    },

    /// Force-remove a volume
    Rm {
        /// Volume name
        name: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Handle config command separately (doesn't need the engine)
    if let Commands::Config { init } = &cli.command {
        commands::config(*init).await?;
        return Ok(());
    }

    let mut config = GlobalConfig::load()?;
    if let Some(socket) = cli.socket {
        config.docker.socket = socket;
    }
    tracing::debug!("Using config: {:?}", config);

    let admin = ContainerAdmin::connect(&config).await?;

    match cli.command {
        Commands::Ls {
            all,
            filter,
            raw,
            json,
        } => {
            let filter: ContainerFilter = filter.parse().map_err(anyhow::Error::msg)?;
            commands::list(&admin, filter, all, raw, json).await?;
        }
        Commands::Info { container, json } => {
            commands::info(&admin, &container, json).await?;
        }
        Commands::Rm {
            container,
            force,
            volumes,
            link,
        } => {
            let options = RemoveOptions {
                force,
                volumes,
                link,
            };
            commands::remove(&admin, &container, options).await?;
        }
        Commands::Volume { command } => match command {
            VolumeCommands::Exists { name } => {
                commands::volume_exists(&admin, &name).await?;
            }
            VolumeCommands::Create { name, size } => {
                commands::volume_create(&admin, &name, size).await?;
            }
            VolumeCommands::Rm { name } => {
                commands::volume_remove(&admin, &name).await?;
            }
        },
        // Handled before connecting
        Commands::Config { .. } => {}
    }

    Ok(())
}
