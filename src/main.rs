use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use synaptic::{
    infrastructure::{init_logging, tabular::ParserFactory},
    start_server, AppConfig, AppState, OpenAiChatProvider, ServerConfig, SymbolicSolver,
};

/// Synaptic - engineering assistant backend
#[derive(Parser)]
#[command(name = "synaptic-server")]
#[command(about = "Equation solving, chat forwarding and tabular previews over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration and exit
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

    // 1) defaults -> 2) YAML (if provided) -> 3) env (SYNAPTIC__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.verbose);

    init_logging(&config.logging);

    if cli.print_config {
        println!(
            "Effective configuration:\n{}",
            serde_json::to_string_pretty(&config.redacted())?
        );
        return Ok(());
    }

    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    if config.chat.api_key.is_none() {
        tracing::warn!("chat.api_key is not set; the server will refuse to start");
    }
    println!("Configuration is valid");
    println!("{}", serde_json::to_string_pretty(&config.redacted())?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    let address = config.bind_address()?;
    let api_key = config.require_api_key()?.to_string();

    let solver = Arc::new(SymbolicSolver::with_limits(config.solver.limits()));
    let chat = Arc::new(OpenAiChatProvider::new(&config.chat, api_key)?);

    let state = AppState {
        solver,
        chat,
        parsers: ParserFactory::new(),
        preview_rows: config.upload.preview_rows,
    };

    tracing::info!("Synaptic backend starting");
    start_server(ServerConfig::new(address, state, config)).await
}
