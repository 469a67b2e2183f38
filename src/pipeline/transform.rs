// src/pipeline/transform.rs

use crate::errors::Result;
use crate::pipeline::Asset;

/// One step of a pipeline.
///
/// Implementations wrap an external tool (compiler, prefixer, encoder...)
/// and must report failures with a per-file error variant
/// (`CompileError`, `CssError`, `ImageError`) so skip-mode pipelines can
/// tell them apart from IO failures.
pub trait Transform: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, asset: Asset) -> Result<Asset>;
}
