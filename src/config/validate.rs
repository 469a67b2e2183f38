// src/config/validate.rs

use std::path::Path;

use globset::Glob;
use lightningcss::targets::Browsers;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AssetpipeError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AssetpipeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_style(cfg)?;
    validate_image(cfg)?;
    validate_watch(cfg)?;
    Ok(())
}

fn config_error(msg: impl Into<String>) -> AssetpipeError {
    AssetpipeError::ConfigError(msg.into())
}

fn validate_style(cfg: &RawConfigFile) -> Result<()> {
    let style = &cfg.style;

    let ext = Path::new(&style.entry)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !matches!(ext, "scss" | "sass" | "css") {
        return Err(config_error(format!(
            "[style].entry must be a .scss, .sass or .css file (got {:?})",
            style.entry
        )));
    }

    if style.dest.trim().is_empty() {
        return Err(config_error("[style].dest must not be empty"));
    }

    if style.browsers.is_empty() {
        return Err(config_error("[style].browsers must contain at least one query"));
    }
    Browsers::from_browserslist(style.browsers.iter()).map_err(|e| {
        config_error(format!("[style].browsers is not a valid browserslist query: {e}"))
    })?;

    Ok(())
}

fn validate_image(cfg: &RawConfigFile) -> Result<()> {
    let image = &cfg.image;

    if image.width == 0 {
        return Err(config_error("[image].width must be >= 1 (got 0)"));
    }
    if !(1..=100).contains(&image.jpeg_quality) {
        return Err(config_error(format!(
            "[image].jpeg_quality must be between 1 and 100 (got {})",
            image.jpeg_quality
        )));
    }
    if image.dest.trim().is_empty() {
        return Err(config_error("[image].dest must not be empty"));
    }
    check_glob("[image].src", &image.src)?;

    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    let watch = &cfg.watch;

    if watch.patterns.is_empty() {
        return Err(config_error("[watch].patterns must contain at least one glob"));
    }
    for pat in watch.patterns.iter() {
        check_glob("[watch].patterns", pat)?;
    }
    for pat in watch.exclude.iter() {
        check_glob("[watch].exclude", pat)?;
    }

    Ok(())
}

fn check_glob(field: &str, pattern: &str) -> Result<()> {
    Glob::new(pattern)
        .map(|_| ())
        .map_err(|e| config_error(format!("{field}: invalid glob pattern {pattern:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_config_error(raw: RawConfigFile, needle: &str) {
        match ConfigFile::try_from(raw) {
            Err(AssetpipeError::ConfigError(msg)) => {
                assert!(msg.contains(needle), "message {msg:?} lacks {needle:?}")
            }
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(ConfigFile::try_from(RawConfigFile::default()).is_ok());
    }

    #[test]
    fn zero_width_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.image.width = 0;
        expect_config_error(raw, "[image].width");
    }

    #[test]
    fn jpeg_quality_out_of_range() {
        let mut raw = RawConfigFile::default();
        raw.image.jpeg_quality = 0;
        expect_config_error(raw, "jpeg_quality");
    }

    #[test]
    fn entry_must_be_a_stylesheet() {
        let mut raw = RawConfigFile::default();
        raw.style.entry = "src/static/sass/main.less".to_string();
        expect_config_error(raw, "[style].entry");
    }

    #[test]
    fn broken_watch_glob() {
        let mut raw = RawConfigFile::default();
        raw.watch.patterns = vec!["src/[unclosed".to_string()];
        expect_config_error(raw, "invalid glob pattern");
    }

    #[test]
    fn empty_watch_patterns() {
        let mut raw = RawConfigFile::default();
        raw.watch.patterns.clear();
        expect_config_error(raw, "[watch].patterns");
    }

    #[test]
    fn bogus_browserslist_query() {
        let mut raw = RawConfigFile::default();
        raw.style.browsers = vec!["not a real browser query at all".to_string()];
        expect_config_error(raw, "browserslist");
    }
}
