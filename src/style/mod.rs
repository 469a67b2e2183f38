// src/style/mod.rs

//! Stylesheet build: entry stylesheet → compile → autoprefix → minify →
//! CSS directory.

pub mod compile;
pub mod postcss;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::config::StyleSection;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pipeline::{Pipeline, RunReport, Source};
use crate::types::FailureMode;

pub use compile::SassCompile;
pub use postcss::{Autoprefix, Minify};

/// The stylesheet pipeline with all paths resolved against a project root.
///
/// Built once and run as often as needed (the watch loop reruns it on every
/// change), so construction does the config-dependent work up front.
#[derive(Debug)]
pub struct StyleTask {
    pipeline: Pipeline,
    entry: PathBuf,
}

impl StyleTask {
    pub fn new(root: &Path, section: &StyleSection, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let entry = root.join(&section.entry);
        let include_paths = section.include_paths.iter().map(|p| root.join(p)).collect();
        let prefix = Autoprefix::from_queries(&section.browsers)?;

        let mut pipeline = Pipeline::new(
            "css",
            Source::file(&entry)?,
            root.join(&section.dest),
            FailureMode::Abort,
            Arc::clone(&fs),
        )
        .pipe(SassCompile::new(include_paths, fs))
        .pipe(prefix);
        if section.minify {
            pipeline = pipeline.pipe(Minify::new(prefix.targets()));
        }

        Ok(Self { pipeline, entry })
    }

    /// Compile once. Nothing is written when any step fails.
    pub fn run(&self) -> Result<RunReport> {
        info!(entry = ?self.entry, "building stylesheet");
        let result = self.pipeline.run();
        if let Err(ref err) = result {
            error!(entry = ?self.entry, "stylesheet build failed: {err}");
        }
        result
    }
}
