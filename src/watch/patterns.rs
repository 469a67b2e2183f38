// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::WatchSection;
use crate::fs::FileSystem;
use crate::pipeline::source::split_glob_base;

/// Compiled watch/exclude patterns, relative to the project root.
#[derive(Clone)]
pub struct WatchProfile {
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
    /// Literal directory prefix of every watch pattern, deduplicated.
    bases: Vec<PathBuf>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("bases", &self.bases)
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    pub fn new(watch: &[String], exclude: &[String]) -> Result<Self> {
        let watch_set = build_globset(watch).context("building watch globset")?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        let mut bases: Vec<PathBuf> = watch.iter().map(|p| split_glob_base(p).0).collect();
        bases.sort();
        bases.dedup();
        // A base nested in another one is already covered by the recursive watch.
        let covered: Vec<bool> = bases
            .iter()
            .map(|b| bases.iter().any(|o| o != b && b.starts_with(o)))
            .collect();
        let bases = bases
            .into_iter()
            .zip(covered)
            .filter_map(|(b, c)| (!c).then_some(b))
            .collect();

        Ok(Self {
            watch_set,
            exclude_set,
            bases,
        })
    }

    pub fn from_config(section: &WatchSection) -> Result<Self> {
        Self::new(&section.patterns, &section.exclude)
    }

    /// Directories (relative to the root) that need a recursive watch.
    pub fn bases(&self) -> &[PathBuf] {
        &self.bases
    }

    /// True if a path relative to the project root, e.g.
    /// `"src/static/sass/_grid.scss"`, should trigger a rebuild.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }

    /// Like [`matches`](Self::matches) for an absolute path under `root`.
    pub fn matches_path(&self, root: &Path, path: &Path) -> bool {
        relative_str(root, path).is_some_and(|rel| self.matches(&rel))
    }
}

/// `path` relative to `root` with `/` separators, if it is inside `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect all files under the profile's base directories that match it.
///
/// Used by the hash gate to fingerprint the watched tree. Missing base
/// directories contribute nothing.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    profile: &WatchProfile,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack: Vec<PathBuf> = profile
        .bases()
        .iter()
        .map(|b| root.join(b))
        .filter(|b| fs.is_dir(b))
        .collect();

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) && profile.matches_path(root, &path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn profile(watch: &[&str], exclude: &[&str]) -> WatchProfile {
        let w: Vec<String> = watch.iter().map(|s| s.to_string()).collect();
        let e: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        WatchProfile::new(&w, &e).unwrap()
    }

    #[test]
    fn default_pattern_matches_nested_partials() {
        let p = profile(&["src/static/sass/**/*.scss"], &[]);

        assert!(p.matches("src/static/sass/main.scss"));
        assert!(p.matches("src/static/sass/layout/_grid.scss"));
        assert!(!p.matches("src/static/css/main.css"));
        assert!(!p.matches("src/static/sass/notes.md"));
    }

    #[test]
    fn exclude_wins() {
        let p = profile(&["sass/**/*.scss"], &["sass/vendor/**"]);

        assert!(p.matches("sass/a.scss"));
        assert!(!p.matches("sass/vendor/b.scss"));
    }

    #[test]
    fn nested_bases_collapse() {
        let p = profile(&["src/sass/**/*.scss", "src/sass/themes/*.scss", "lib/*.scss"], &[]);

        assert_eq!(p.bases(), &[PathBuf::from("lib"), PathBuf::from("src/sass")]);
    }

    #[test]
    fn collects_only_matching_files() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/sass/main.scss", b"".to_vec());
        fs.add_file("/p/sass/parts/_a.scss", b"".to_vec());
        fs.add_file("/p/sass/readme.txt", b"".to_vec());
        fs.add_file("/p/other/x.scss", b"".to_vec());

        let files =
            collect_matching_files(&fs, Path::new("/p"), &profile(&["sass/**/*.scss"], &[]))
                .unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("/p/sass/main.scss"),
                PathBuf::from("/p/sass/parts/_a.scss")
            ]
        );
    }
}
