//! Command-line interface for dbtest
//!
//! # Usage Examples
//!
//! ```bash
//! # Use ./appsettings.json
//! dbtest
//!
//! # Another settings file, read-only run against the secondary server
//! isReadOnly=true isFailover=true dbtest --config /etc/dbtest/appsettings.json
//!
//! # Only honour DBTEST_-prefixed environment overrides
//! DBTEST_iLoops=10 DBTEST_db__userId=sa dbtest --env-prefix DBTEST_
//!
//! # Exercise the loop without a server
//! dbtest --dry-run
//! ```

use anyhow::Context;
use clap::Parser;
use smoke_settings::Settings;
use sqlserver_demo::memory::MemoryConnector;
use sqlserver_demo::{Connector, SqlServerConnector};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dbtest")]
#[command(about = "Smoke-test a SQL Server with timestamped writes and reads")]
#[command(long_about = None)]
struct Cli {
    /// JSON settings file (optional; environment variables override it)
    #[arg(long, default_value = "appsettings.json", env = "DBTEST_CONFIG")]
    config: PathBuf,

    /// Only read environment overrides starting with this prefix (stripped)
    #[arg(long, env = "DBTEST_ENV_PREFIX")]
    env_prefix: Option<String>,

    /// Dry run mode - use an in-memory Demo table instead of SQL Server
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let builder = Settings::builder().add_json_file(&cli.config, true);
    let builder = match &cli.env_prefix {
        Some(prefix) => builder.add_prefixed_environment_variables(prefix),
        None => builder.add_environment_variables(),
    };
    let settings = builder
        .build()
        .with_context(|| format!("Failed to load settings from {:?}", cli.config))?;

    let connector: Box<dyn Connector> = if cli.dry_run {
        tracing::info!("Running in dry-run mode - no database will be contacted");
        Box::new(MemoryConnector::new())
    } else {
        Box::new(SqlServerConnector)
    };

    let stdout = std::io::stdout();
    let stdin = std::io::stdin();
    dbtest::execute(
        &settings,
        connector.as_ref(),
        stdout.lock(),
        &mut stdin.lock(),
    )
    .await?;

    Ok(())
}
