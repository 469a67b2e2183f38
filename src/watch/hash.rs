// src/watch/hash.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use blake3::Hasher;
use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::patterns::{WatchProfile, collect_matching_files};

/// Compute a deterministic hash over the paths and contents of the given
/// files. Order of `paths` does not matter; they are sorted first.
pub fn compute_hash_for_paths<I, P>(fs: &dyn FileSystem, paths: I) -> Result<String>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut sorted: Vec<PathBuf> = paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
    sorted.sort();

    let mut hasher = Hasher::new();
    for path in sorted {
        // Length-prefix both fields so ("ab", "c") and ("a", "bc") differ.
        let name = path.to_string_lossy();
        hasher.update(&(name.len() as u64).to_le_bytes());
        hasher.update(name.as_bytes());

        match fs.read(&path) {
            Ok(contents) => {
                hasher.update(&(contents.len() as u64).to_le_bytes());
                hasher.update(&contents);
            }
            // Deleted between listing and reading; hash it as absent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                hasher.update(&u64::MAX.to_le_bytes());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Suppresses triggers when the watched tree's content did not change.
///
/// Editors often touch files (save without edits, metadata updates) which
/// `notify` reports as changes; with the gate on, those never reach the
/// compile loop.
#[derive(Debug, Default)]
pub struct HashGate {
    last: Option<String>,
}

impl HashGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current hash without deciding anything (used at startup,
    /// right after the initial build).
    pub fn prime(&mut self, fs: &dyn FileSystem, root: &Path, profile: &WatchProfile) -> Result<()> {
        self.last = Some(tree_hash(fs, root, profile)?);
        Ok(())
    }

    /// Returns true if the watched content differs from the last recorded
    /// state, and records the new state.
    pub fn should_trigger(
        &mut self,
        fs: &dyn FileSystem,
        root: &Path,
        profile: &WatchProfile,
    ) -> Result<bool> {
        let current = tree_hash(fs, root, profile)?;
        if self.last.as_deref() == Some(current.as_str()) {
            debug!(hash = %current, "watched content unchanged; skipping trigger");
            return Ok(false);
        }
        self.last = Some(current);
        Ok(true)
    }
}

fn tree_hash(fs: &dyn FileSystem, root: &Path, profile: &WatchProfile) -> Result<String> {
    let files = collect_matching_files(fs, root, profile)?;
    compute_hash_for_paths(fs, &files)
}
