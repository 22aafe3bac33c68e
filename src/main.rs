use clap::{Parser, Subcommand};
use database::{Database, DatabaseConfig, handle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// The main entry point for the stratstore application.
///
/// This binary owns process startup: it resolves the storage location,
/// initializes the database exactly once (applying any pending
/// migrations), and installs the shared handle before anything else runs.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, when one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // DATABASE_URL wins over config.toml, so deployments can point the same
    // binary at different storage without editing files.
    let (location, db_config) = match std::env::var("DATABASE_URL") {
        Ok(url) => (url, DatabaseConfig::default()),
        Err(_) => {
            let settings = configuration::load_config()?.database;
            let db_config = DatabaseConfig {
                max_connections: settings.max_connections,
                acquire_timeout: Duration::from_secs(settings.acquire_timeout_secs),
            };
            (settings.location, db_config)
        }
    };

    let db = Database::initialize_with_config(&location, &db_config).await?;
    handle::install(db)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Migrate => {
            let db = handle::get()?;
            let applied = database::applied_migration_count(db.pool()).await?;
            tracing::info!(applied, "schema is up to date");
        }
        Commands::Status => {
            print_status(&handle::get()?).await?;
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Persistence layer for a trading-strategy execution system.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the database and apply any pending schema migrations.
    Migrate,
    /// Show the registered strategies and their execution counts.
    Status,
}

async fn print_status(db: &Database) -> anyhow::Result<()> {
    let repo = db.repository();
    let strategies = repo.get_all_strategies().await?;
    if strategies.is_empty() {
        println!("No strategies registered.");
        return Ok(());
    }

    for strategy in strategies {
        let executions = repo.count_executions_for_strategy(&strategy.id).await?;
        let state = if strategy.is_active { "active" } else { "disabled" };
        println!(
            "{} [{}] {} ({}) on chain {} - {} execution(s)",
            strategy.id, state, strategy.name, strategy.kind, strategy.chain_id, executions
        );
    }
    Ok(())
}
