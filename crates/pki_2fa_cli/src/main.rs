mod commands;
mod config;

use clap::Parser;
use config::{resolve_settings, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = resolve_settings(&cli)?;
    commands::run(&cli.command, &settings)
}
