// src/pipeline/asset.rs

use std::path::PathBuf;

use image::{DynamicImage, ImageFormat};

/// A file travelling through a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Where the input was read from. Kept unchanged by transforms so errors
    /// can point at the original file.
    pub source_path: PathBuf,
    /// Path below the destination directory. Transforms may rewrite it,
    /// e.g. to change the extension.
    pub rel_path: PathBuf,
    pub contents: Vec<u8>,
    /// Pixels an earlier transform already decoded, so the next one does not
    /// decode (or re-encode) again. Cleared whenever `contents` is replaced.
    pub decoded: Option<Decoded>,
}

/// A decoded raster and the format it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub image: DynamicImage,
    pub format: ImageFormat,
    /// `image` differs from what `contents` encodes, so it must be encoded
    /// before the asset is written.
    pub modified: bool,
}

impl Asset {
    pub fn new(
        source_path: impl Into<PathBuf>,
        rel_path: impl Into<PathBuf>,
        contents: Vec<u8>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            rel_path: rel_path.into(),
            contents,
            decoded: None,
        }
    }

    pub fn with_extension(mut self, ext: &str) -> Self {
        self.rel_path.set_extension(ext);
        self
    }

    pub fn with_contents(mut self, contents: Vec<u8>) -> Self {
        self.contents = contents;
        self.decoded = None;
        self
    }

    pub fn with_decoded(mut self, decoded: Decoded) -> Self {
        self.decoded = Some(decoded);
        self
    }
}
