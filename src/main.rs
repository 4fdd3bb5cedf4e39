// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Create {
            version,
            sources,
            configuration,
            output,
            source_cache,
            jobs,
            keep_builddir,
            cmake,
        } => commands::cmd_create(
            &version,
            &sources,
            &configuration,
            config,
            output.as_deref(),
            source_cache.as_deref(),
            jobs,
            keep_builddir,
            cmake.as_deref(),
        ),
        Commands::Fetch {
            version,
            sources,
            source_cache,
        } => commands::cmd_fetch(&version, &sources, config, source_cache.as_deref()),
        Commands::Info {
            version,
            configuration,
            json,
        } => commands::cmd_info(&version, &configuration, config, json),
    }
}
