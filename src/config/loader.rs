// src/config/loader.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AssetpipeError, Result};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        AssetpipeError::IoError(io::Error::new(
            e.kind(),
            format!("reading config {}: {e}", path.display()),
        ))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Config file looked up in the current directory when `--config` is absent.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Assetpipe.toml")
}

/// Resolve the configuration and the project root it applies to.
///
/// - An explicit path must exist; the root is the directory holding it.
/// - Otherwise `Assetpipe.toml` in the current directory is used if present.
/// - Otherwise the built-in defaults apply, rooted at the current directory.
pub fn resolve(explicit: Option<&Path>) -> Result<(ConfigFile, PathBuf)> {
    if let Some(path) = explicit {
        let cfg = load_and_validate(path)?;
        return Ok((cfg, config_root_dir(path)));
    }

    let cwd = std::env::current_dir()?;
    let default_path = cwd.join(default_config_path());
    if default_path.is_file() {
        debug!(path = ?default_path, "using config from current directory");
        let cfg = load_and_validate(&default_path)?;
        return Ok((cfg, cwd));
    }

    debug!("no config file found; using built-in defaults");
    let cfg = ConfigFile::try_from(RawConfigFile::default())?;
    Ok((cfg, cwd))
}

/// Directory that relative config paths resolve against.
///
/// A bare file name (parent = "") means the current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
