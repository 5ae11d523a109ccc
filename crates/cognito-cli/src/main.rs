//! Cognito CLI - Command-line interface for hypothesis synthesis.

use clap::Parser;
use cognito_cli::commands;
use cognito_cli::{AppConfig, Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Synthesize(args) => {
            commands::execute_synthesize(args, &config, &formatter).await?;
        }
        Command::Status(args) => {
            commands::execute_status(args, &config, &formatter).await?;
        }
        Command::Result(args) => {
            commands::execute_result(args, &config, &formatter).await?;
        }
        Command::Sessions(args) => {
            commands::execute_sessions(args, &config, &formatter)?;
        }
    }

    Ok(())
}
