// src/style/compile.rs

//! SCSS → CSS via [`grass`].

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use grass::{Options, OutputStyle};

use crate::errors::{AssetpipeError, Result};
use crate::fs::FileSystem;
use crate::pipeline::{Asset, Transform};

/// Lets grass resolve imports through our [`FileSystem`].
#[derive(Debug)]
struct GrassFs<'a>(&'a dyn FileSystem);

impl grass::Fs for GrassFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.0.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.0.is_file(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.0.read(path)
    }
}

/// Compiles the asset's stylesheet source and renames it to `.css`.
///
/// Imports are looked up next to the entry file first, then in
/// `include_paths` in order.
#[derive(Debug)]
pub struct SassCompile {
    include_paths: Vec<PathBuf>,
    fs: Arc<dyn FileSystem>,
}

impl SassCompile {
    pub fn new(include_paths: Vec<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self { include_paths, fs }
    }

    fn compile(&self, source: &str, entry: &Path) -> std::result::Result<String, String> {
        let grass_fs = GrassFs(self.fs.as_ref());
        let mut options = Options::default()
            .style(OutputStyle::Expanded)
            .quiet(true)
            .fs(&grass_fs);
        if let Some(dir) = entry.parent() {
            options = options.load_path(dir);
        }
        for path in self.include_paths.iter() {
            options = options.load_path(path);
        }

        grass::from_string(source.to_owned(), &options).map_err(|e| e.to_string())
    }
}

impl Transform for SassCompile {
    fn name(&self) -> &'static str {
        "sass"
    }

    fn apply(&self, asset: Asset) -> Result<Asset> {
        let source = String::from_utf8(asset.contents.clone()).map_err(|e| {
            AssetpipeError::CompileError {
                path: asset.source_path.clone(),
                message: format!("source is not valid UTF-8: {e}"),
            }
        })?;

        let css = self
            .compile(&source, &asset.source_path)
            .map_err(|message| AssetpipeError::CompileError {
                path: asset.source_path.clone(),
                message,
            })?;

        Ok(asset.with_contents(css.into_bytes()).with_extension("css"))
    }
}
