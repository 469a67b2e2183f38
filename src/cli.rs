// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `assetpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assetpipe",
    version,
    about = "Build stylesheets and images, and rebuild styles on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Entry point to run. Defaults to `watch`.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the config file (TOML).
    ///
    /// If omitted, `Assetpipe.toml` in the current directory is used when it
    /// exists; otherwise the built-in defaults apply.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASSETPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Load and validate the config, print the resolved plan, build nothing.
    #[arg(long, global = true)]
    pub dry_run: bool,
}

/// Named entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Compile, prefix and minify the entry stylesheet once.
    Css,
    /// Resize and optimize the source images once.
    Img,
    /// Build styles and images once, then rebuild styles on change.
    Watch,
}

impl CliArgs {
    /// The entry point to run; no subcommand means `watch`.
    pub fn entry(&self) -> Command {
        self.command.unwrap_or(Command::Watch)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
