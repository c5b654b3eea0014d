//! Volders admin command line.
//!
//! Loads configuration, initialises logging, builds the configured
//! repository backend, and runs one maintenance command against it.

use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use volders::RepositoryManager;
use volders::logging::init_logging;
use volders_core::config::AppConfig;
use volders_core::error::AppError;
use volders_core::traits::VolderRepository;
use volders_core::types::ObjectId;
use volders_database::DatabasePool;

/// Folder and file repository administration
#[derive(Debug, Parser)]
#[command(name = "volders", version, about, long_about = None)]
struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default")]
    config: String,

    /// Environment overlay loaded from `config/{env}`
    #[arg(short, long, env = "VOLDERS_ENV", default_value = "development")]
    env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Check that the configured backend is reachable
    Health,
    /// Print a folder and all of its descendants as JSON
    Hierarchy {
        /// Root folder ID
        folder_id: String,
        /// Abort the traversal after this many seconds
        #[arg(short, long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(cli.command, config).await {
        tracing::error!("Command failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: AppConfig) -> Result<(), AppError> {
    match command {
        Commands::Migrate => {
            let db = DatabasePool::connect(&config.database).await?;
            volders_database::migration::run_migrations(db.pool()).await?;
            db.close().await;
            println!("All migrations applied successfully.");
        }
        Commands::Health => {
            let manager = RepositoryManager::new(&config).await?;
            let healthy = manager.health_check().await?;
            println!(
                "{} backend: {}",
                config.repository.backend,
                if healthy { "ok" } else { "unhealthy" }
            );
        }
        Commands::Hierarchy {
            folder_id,
            timeout_secs,
        } => {
            let manager = RepositoryManager::new(&config).await?;
            let timeout = Duration::from_secs(
                timeout_secs.unwrap_or(config.repository.hierarchy_timeout_seconds),
            );

            let cancel = CancellationToken::new();
            let watchdog = spawn_watchdog(cancel.clone(), timeout);

            let result = manager
                .get_folder_hierarchy(&cancel, &ObjectId::from(folder_id))
                .await;
            watchdog.abort();

            let folders = result?;
            println!("{}", serde_json::to_string_pretty(&folders)?);
        }
    }

    Ok(())
}

/// Cancel `cancel` on Ctrl-C or once `timeout` elapses.
fn spawn_watchdog(cancel: CancellationToken, timeout: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(?timeout, "Hierarchy traversal timed out");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted, cancelling traversal");
            }
        }
        cancel.cancel();
    })
}
