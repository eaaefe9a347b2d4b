use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::client;
use cli::commands::Commands;
use txcycle::chain::RpcConnector;
use txcycle::config::Config;
use txcycle::daemon::{AppContext, ControlReply};

fn setup_logging(to_stderr: bool, verbose: bool) -> Result<()> {
    let default_filter = if verbose { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if to_stderr {
        builder.target(env_logger::Target::Stderr).init();
        return Ok(());
    }

    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("txcycle")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("txcycle.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None | Some(Commands::Serve) => serve(config).await,
        Some(Commands::Start { url }) => print_reply(client::control(url, "start").await?),
        Some(Commands::Stop { url }) => print_reply(client::control(url, "stop").await?),
        Some(Commands::Status { url }) => {
            let state = client::status(url).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(())
        }
        Some(Commands::Watch { url }) => {
            let status = client::watch(url).await?;
            println!("{} {:?}", "Run ended:".cyan(), status);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(
        "Serving {} cycle(s) against {} (amounts {}..{}, delays {}..{} ms)",
        config.cycles.default,
        config.network.rpc,
        config.cycles.amounts.min,
        config.cycles.amounts.max,
        config.cycles.delays.min,
        config.cycles.delays.max
    );

    let ctx = Arc::new(AppContext::new(config, Arc::new(RpcConnector)));
    txcycle::daemon::serve(ctx, &addr)
        .await
        .with_context(|| format!("Dashboard server failed on {addr}"))?;
    Ok(())
}

fn print_reply(reply: ControlReply) -> Result<()> {
    match &reply {
        ControlReply::Ok { .. } => println!("{}", "ok".green()),
        ControlReply::Error { error } => println!("{} {}", "refused:".red(), error),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.stderr, cli.verbose).context("Failed to setup logging")?;

    // Load configuration
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.apply_env();
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Run the main application logic
    run_application(&cli, config)
        .await
        .context("Application failed")?;

    Ok(())
}
