//! Claimscan CLI - flag policy violations in insurance claim documents.

use anyhow::Context;
use claimscan_cli::{commands, logging, Cli, Command, Config, Formatter};
use clap::Parser;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => {
            commands::execute_run(args, &config, &formatter).await?;
        }
        Command::Categories(args) => {
            logging::init_stderr()?;
            commands::execute_categories(args, &config, &formatter)?;
        }
    }

    Ok(())
}
