// src/pipeline/mod.rs

//! Generic "files through transforms" runner.
//!
//! A [`Pipeline`] expands a [`Source`] glob into [`Asset`]s, pushes each one
//! through an ordered list of [`Transform`]s and writes the result under a
//! destination directory, keeping the asset's path relative to the source
//! base. The style and image builds are both just pipelines with different
//! transforms and a different [`FailureMode`].

pub mod asset;
pub mod source;
pub mod transform;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::FailureMode;

pub use asset::Asset;
pub use source::{Source, SourceFile};
pub use transform::Transform;

/// One input that could not be transformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Destination paths written, in source order.
    pub written: Vec<PathBuf>,
    /// Inputs skipped because reading or a transform failed (only in
    /// [`FailureMode::Skip`]).
    pub failed: Vec<FileFailure>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Pipeline {
    name: &'static str,
    source: Source,
    transforms: Vec<Box<dyn Transform>>,
    dest: PathBuf,
    failure_mode: FailureMode,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let transforms: Vec<_> = self.transforms.iter().map(|t| t.name()).collect();
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("transforms", &transforms)
            .field("dest", &self.dest)
            .field("failure_mode", &self.failure_mode)
            .finish()
    }
}

impl Pipeline {
    pub fn new(
        name: &'static str,
        source: Source,
        dest: impl Into<PathBuf>,
        failure_mode: FailureMode,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            name,
            source,
            transforms: Vec::new(),
            dest: dest.into(),
            failure_mode,
            fs,
        }
    }

    /// Append a transform; transforms run in the order they were added.
    pub fn pipe(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Run every matching input to completion.
    ///
    /// Inputs are read one at a time. A missing source and failed writes
    /// always abort. Read and transform failures abort in
    /// [`FailureMode::Abort`]; in [`FailureMode::Skip`] they are logged,
    /// recorded in the report, and the next input is processed.
    pub fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let inputs = self.source.expand(self.fs.as_ref())?;
        debug!(pipeline = self.name, inputs = inputs.len(), "expanded source");

        let mut report = RunReport::default();

        for SourceFile { path, rel_path } in inputs {
            let contents = match self.fs.read(&path) {
                Ok(contents) => contents,
                Err(err) if self.failure_mode == FailureMode::Skip => {
                    self.skip(&mut report, path, &err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let origin = path.clone();
            let asset = match self.apply_all(Asset::new(path, rel_path, contents)) {
                Ok(asset) => asset,
                Err(err) if self.failure_mode == FailureMode::Skip && err.is_per_file() => {
                    self.skip(&mut report, origin, &err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            let out_path = self.dest.join(&asset.rel_path);
            self.fs.write(&out_path, &asset.contents)?;
            debug!(
                pipeline = self.name,
                from = ?origin,
                to = ?out_path,
                bytes = asset.contents.len(),
                "wrote output"
            );
            report.written.push(out_path);
        }

        info!(
            pipeline = self.name,
            written = report.written.len(),
            failed = report.failed.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "pipeline finished"
        );
        Ok(report)
    }

    fn skip(&self, report: &mut RunReport, path: PathBuf, err: &dyn fmt::Display) {
        warn!(pipeline = self.name, path = ?path, "skipping input: {err}");
        report.failed.push(FileFailure {
            path,
            message: err.to_string(),
        });
    }

    fn apply_all(&self, mut asset: Asset) -> Result<Asset> {
        for transform in self.transforms.iter() {
            asset = transform.apply(asset)?;
        }
        Ok(asset)
    }
}
