mod affiliate;
mod auth;
mod batch;
mod cli;
mod config;
mod doctype;
mod error;
mod input;
mod output;

use clap::Parser;
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Command::Run { only, delay_ms } => cli::run::run(&cli.dir, &only, delay_ms).await?,
        Command::Consolidate => {
            let sources = cli::consolidate::default_sources(&cli.dir);
            cli::consolidate::consolidate(&cli.dir, &sources)?;
        }
        Command::DocTypes => cli::doctypes::doc_types(&cli.dir)?,
        Command::Login => cli::login::login(&cli.dir).await?,
    }

    Ok(())
}
