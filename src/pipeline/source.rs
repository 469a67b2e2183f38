// src/pipeline/source.rs

use std::io;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

use crate::errors::{AssetpipeError, Result};
use crate::fs::FileSystem;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Split a `/`-separated pattern into its literal directory prefix and the
/// remaining glob part, e.g. `src/static/sass/**/*.scss` into
/// (`src/static/sass`, `**/*.scss`).
///
/// A pattern without glob characters is split into (parent, file name).
pub fn split_glob_base(pattern: &str) -> (PathBuf, String) {
    let parts: Vec<&str> = pattern.split('/').filter(|p| !p.is_empty() && *p != ".").collect();
    let literal = parts
        .iter()
        .take_while(|p| !p.contains(GLOB_META))
        .count();

    let cut = if literal == parts.len() {
        literal.saturating_sub(1)
    } else {
        literal
    };

    let mut base = PathBuf::new();
    if pattern.starts_with('/') {
        base.push("/");
    }
    base.extend(&parts[..cut]);
    let rest = parts[cut..].join("/");
    (base, rest)
}

/// A matched input: where to read it and where it lands below the
/// destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub rel_path: PathBuf,
}

/// Files an input pattern selects, relative to a project root.
#[derive(Debug, Clone)]
pub struct Source {
    pattern: String,
    base: PathBuf,
    matcher: Option<GlobMatcher>,
    recursive: bool,
    include_hidden: bool,
    /// Set when the pattern names one file rather than a glob.
    single_file: Option<PathBuf>,
}

impl Source {
    pub fn new(root: &Path, pattern: &str) -> Result<Self> {
        let (rel_base, rest) = split_glob_base(pattern);
        if !rest.contains(GLOB_META) {
            return Self::file(&root.join(rel_base).join(rest));
        }
        let recursive = rest.contains('/') || rest.contains("**");
        let include_hidden = rest.split('/').any(|part| part.starts_with('.'));

        let matcher = GlobBuilder::new(&rest)
            .literal_separator(true)
            .build()
            .map_err(|e| {
                AssetpipeError::ConfigError(format!("invalid source pattern {pattern:?}: {e}"))
            })?
            .compile_matcher();

        Ok(Self {
            pattern: pattern.to_string(),
            base: root.join(rel_base),
            matcher: Some(matcher),
            recursive,
            include_hidden,
            single_file: None,
        })
    }

    /// Source reading exactly one file; its name is kept as the output name.
    pub fn file(path: &Path) -> Result<Self> {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let name = path.file_name().ok_or_else(|| {
            AssetpipeError::ConfigError(format!("not a file path: {}", path.display()))
        })?;

        Ok(Self {
            pattern: path.display().to_string(),
            base: parent.to_path_buf(),
            matcher: None,
            recursive: false,
            include_hidden: true,
            single_file: Some(PathBuf::from(name)),
        })
    }

    /// Every matching file, sorted by relative path. Nothing is read yet.
    ///
    /// Hidden entries (names starting with `.`) are skipped unless the
    /// pattern itself names dot files.
    pub fn expand(&self, fs: &dyn FileSystem) -> Result<Vec<SourceFile>> {
        let matcher = match (&self.single_file, &self.matcher) {
            (Some(name), _) => return self.expand_single(fs, name),
            (None, Some(matcher)) => matcher,
            (None, None) => return Ok(Vec::new()),
        };

        if !fs.is_dir(&self.base) {
            return Err(AssetpipeError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "source directory {} for pattern {:?} does not exist",
                    self.base.display(),
                    self.pattern
                ),
            )));
        }

        let mut matches = Vec::new();
        let mut stack = vec![self.base.clone()];
        while let Some(dir) = stack.pop() {
            for path in fs.read_dir(&dir)? {
                if !self.include_hidden && is_hidden(&path) {
                    continue;
                }
                if fs.is_dir(&path) {
                    if self.recursive {
                        stack.push(path);
                    }
                } else if fs.is_file(&path) {
                    if let Ok(rel) = path.strip_prefix(&self.base) {
                        let rel_str = rel.to_string_lossy().replace('\\', "/");
                        if matcher.is_match(&rel_str) {
                            matches.push(SourceFile {
                                rel_path: rel.to_path_buf(),
                                path: path.clone(),
                            });
                        }
                    }
                }
            }
        }
        matches.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(matches)
    }

    fn expand_single(&self, fs: &dyn FileSystem, name: &Path) -> Result<Vec<SourceFile>> {
        let path = self.base.join(name);
        if !fs.is_file(&path) {
            return Err(AssetpipeError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("source file {} does not exist", path.display()),
            )));
        }
        Ok(vec![SourceFile {
            path,
            rel_path: name.to_path_buf(),
        }])
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
