//! Incident intake CLI entry point.

use anyhow::Context;
use clap::Parser;

use incident_intake::cli::{self, Cli, Commands};
use incident_intake::infrastructure::config::ConfigLoader;
use incident_intake::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        cli::handle_error(&err, json);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    match cli.command {
        Commands::Serve => {
            let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))
                .context("Failed to initialize logging")?;
            cli::commands::serve::execute(config).await
        }
        Commands::Admins(command) => {
            cli::commands::admins::execute(command, &config, cli.json).await
        }
        Commands::CheckConfig => cli::commands::check_config::execute(&config, cli.json).await,
    }
}
