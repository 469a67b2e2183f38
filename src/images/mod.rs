// src/images/mod.rs

//! Image build: source glob → resize → optimize → image directory.
//!
//! One bad input never stops the others; it shows up in
//! [`RunReport::failed`](crate::pipeline::RunReport).

pub mod optimize;
pub mod resize;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ImageSection;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pipeline::{Pipeline, RunReport, Source};
use crate::types::FailureMode;

pub use optimize::Optimize;
pub use resize::{Resize, target_dimensions};

#[derive(Debug)]
pub struct ImageTask {
    pipeline: Pipeline,
}

impl ImageTask {
    pub fn new(root: &Path, section: &ImageSection, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let pipeline = Pipeline::new(
            "img",
            Source::new(root, &section.src)?,
            root.join(&section.dest),
            FailureMode::Skip,
            fs,
        )
        .pipe(Resize::new(section.width, section.upscale))
        .pipe(Optimize::new(section.jpeg_quality));

        Ok(Self { pipeline })
    }

    pub fn run(&self) -> Result<RunReport> {
        info!("building images");
        let report = self.pipeline.run()?;
        if !report.is_clean() {
            warn!(
                failed = report.failed.len(),
                written = report.written.len(),
                "some images could not be processed"
            );
        }
        Ok(report)
    }
}
