//! Promptgate CLI entry point.

use anyhow::Result;
use clap::Parser;

use promptgate::cli::{Cli, Commands};
use promptgate::domain::models::Config;
use promptgate::infrastructure::config::ConfigLoader;
use promptgate::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.config.as_deref(), cli.json).await {
        promptgate::cli::handle_error(err, cli.json);
    }
}

async fn run(command: Commands, config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config: Config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    match command {
        Commands::Simulate(args) => {
            promptgate::cli::commands::simulate::execute(args, &config, json).await
        }
        Commands::Status(args) => {
            promptgate::cli::commands::status::execute(args, &config.storage, json).await
        }
    }
}
