// src/cli/mod.rs
//! CLI definitions for ittcook
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `create` - Fetch, build and package a version
//! - `fetch` - Download and verify a version's sources only
//! - `info` - Show the resolved configuration and metadata without building

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ittcook")]
#[command(author, version)]
#[command(about = "Fetch, build and package the Intel ITT API library", long_about = None)]
pub struct Cli {
    /// Kitchen configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings and option selection shared by commands that evaluate the recipe
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigurationArgs {
    /// Profile file with [settings] and [options] tables
    #[arg(long)]
    pub profile: Option<String>,

    /// Setting override, e.g. `-s os=Windows -s build_type=Debug`
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Option override, e.g. `-o ptmark=True`
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, build and package a version
    Create {
        /// Upstream version to build (e.g. 3.24.0)
        version: String,

        /// Sources data file mapping versions to archive url and sha256
        #[arg(long)]
        sources: String,

        #[command(flatten)]
        configuration: ConfigurationArgs,

        /// Root directory packages are published under
        #[arg(long)]
        output: Option<String>,

        /// Directory for caching downloaded sources
        #[arg(long)]
        source_cache: Option<String>,

        /// Number of parallel build jobs
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Keep the build directory after completion
        #[arg(long)]
        keep_builddir: bool,

        /// Path to the cmake executable
        #[arg(long)]
        cmake: Option<String>,
    },

    /// Download and verify a version's source archive
    Fetch {
        /// Upstream version to fetch
        version: String,

        /// Sources data file mapping versions to archive url and sha256
        #[arg(long)]
        sources: String,

        /// Directory for caching downloaded sources
        #[arg(long)]
        source_cache: Option<String>,
    },

    /// Show resolved settings, options, package id and metadata
    Info {
        /// Upstream version
        version: String,

        #[command(flatten)]
        configuration: ConfigurationArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "ittcook",
            "create",
            "3.24.0",
            "--sources",
            "sources.toml",
            "-s",
            "os=Linux",
            "-o",
            "ptmark=True",
            "--keep-builddir",
        ])
        .unwrap();

        match cli.command {
            Commands::Create {
                version,
                configuration,
                keep_builddir,
                ..
            } => {
                assert_eq!(version, "3.24.0");
                assert_eq!(configuration.settings, vec!["os=Linux"]);
                assert_eq!(configuration.options, vec!["ptmark=True"]);
                assert!(keep_builddir);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_create_requires_sources() {
        assert!(Cli::try_parse_from(["ittcook", "create", "3.24.0"]).is_err());
    }
}
