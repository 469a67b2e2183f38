// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod images;
pub mod logging;
pub mod orchestrator;
pub mod pipeline;
pub mod style;
pub mod types;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::errors::Result;
use crate::fs::RealFileSystem;
use crate::orchestrator::{Project, describe, run_css, run_img, run_watch};

/// High-level entry point used by `main.rs`.
///
/// Resolves the config, then dispatches to the selected entry point.
/// One-shot entries return their error so the process exits non-zero;
/// `watch` only returns on shutdown or when the watcher cannot start.
pub async fn run(args: CliArgs) -> Result<()> {
    let explicit = args.config.as_ref().map(PathBuf::from);
    let (cfg, root) = config::resolve(explicit.as_deref())?;
    let project = Project::new(root, cfg, Arc::new(RealFileSystem));

    if args.dry_run {
        print!("{}", describe(&project));
        debug!("dry-run complete (nothing built)");
        return Ok(());
    }

    match args.entry() {
        Command::Css => {
            let report = run_css(&project).await?;
            info!(written = report.written.len(), "css done");
        }
        Command::Img => {
            let report = run_img(&project).await?;
            info!(
                written = report.written.len(),
                failed = report.failed.len(),
                "img done"
            );
        }
        Command::Watch => run_watch(&project).await?,
    }
    Ok(())
}
