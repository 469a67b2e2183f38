// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Every setting has a default matching the conventional project layout
//! (`src/static/sass`, `src/static/img_src`, ...), so a config file is
//! optional. See [`model`] for the TOML shape.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve};
pub use model::{ConfigFile, ImageSection, RawConfigFile, StyleSection, WatchSection};
