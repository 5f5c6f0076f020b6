mod config;
mod cors;
mod logging;
mod server;
mod shutdown;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use ordering::OrderingModule;
use record_store::AirtableClient;

use crate::config::{AppConfig, CliOverrides};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// ELIS ordering server - store orders over an Airtable base
#[derive(Parser)]
#[command(name = "elis-server")]
#[command(about = "ELIS ordering server - store orders over an Airtable base")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(CliOverrides { port: cli.port });

    logging::init(&config.logging, cli.verbose)?;

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("checking configuration");
    config.validate()?;
    warn_if_unauthenticated(config);
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn warn_if_unauthenticated(config: &AppConfig) {
    if config
        .record_store
        .api_key
        .as_ref()
        .is_none_or(elis_utils::SecretString::is_empty)
    {
        tracing::warn!(
            "no record store API key configured; set AIRTABLE_API_KEY or record_store.api_key"
        );
    }
}

async fn run_server(config: &AppConfig) -> Result<()> {
    config.validate()?;
    warn_if_unauthenticated(config);

    let client =
        AirtableClient::new(&config.record_store).context("failed to build record store client")?;
    let module = OrderingModule::new(Arc::new(client), config.ordering.clone());
    let router = server::build_router(config, &module);

    tracing::info!(
        base_id = %config.record_store.base_id,
        "ELIS ordering server starting"
    );
    server::serve(config, router).await
}
