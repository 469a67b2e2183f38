// src/style/postcss.rs

//! Vendor prefixing and minification, both delegated to `lightningcss`.

use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use crate::errors::{AssetpipeError, Result};
use crate::pipeline::{Asset, Transform};

/// Parse, run the minifier's property handlers for `targets`, print.
///
/// lightningcss adds and drops prefixes inside its minify pass, so even with
/// `minify = false` declarations are normalized on the way through (merged
/// rules, shortest colour spellings). Only the printer keeps the expanded
/// layout.
fn process(asset: &Asset, targets: Targets, minify: bool) -> std::result::Result<String, String> {
    let css = std::str::from_utf8(&asset.contents).map_err(|e| e.to_string())?;
    let filename = asset.source_path.display().to_string();

    let mut sheet = StyleSheet::parse(
        css,
        ParserOptions {
            filename,
            ..ParserOptions::default()
        },
    )
    .map_err(|e| e.to_string())?;

    sheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| e.to_string())?;

    let out = sheet
        .to_css(PrinterOptions {
            minify,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| e.to_string())?;

    Ok(out.code)
}

fn css_error(asset: &Asset, message: String) -> AssetpipeError {
    AssetpipeError::CssError {
        path: asset.source_path.clone(),
        message,
    }
}

/// Adds the vendor prefixes the configured browsers need and drops the ones
/// they don't. Output stays in expanded layout but is otherwise normalized
/// the way lightningcss's minifier does it.
#[derive(Debug, Clone, Copy)]
pub struct Autoprefix {
    targets: Targets,
}

impl Autoprefix {
    /// Build from browserslist queries such as `["defaults"]` or
    /// `["last 2 versions", "> 1%"]`.
    pub fn from_queries<S: AsRef<str>>(queries: &[S]) -> Result<Self> {
        let browsers = Browsers::from_browserslist(queries.iter().map(|q| q.as_ref()))
            .map_err(|e| AssetpipeError::ConfigError(format!("invalid browserslist query: {e}")))?;
        Ok(Self::with_browsers(browsers))
    }

    pub fn with_browsers(browsers: Option<Browsers>) -> Self {
        let targets = browsers.map(Targets::from).unwrap_or_default();
        Self { targets }
    }

    pub fn targets(&self) -> Targets {
        self.targets
    }
}

impl Transform for Autoprefix {
    fn name(&self) -> &'static str {
        "autoprefix"
    }

    fn apply(&self, asset: Asset) -> Result<Asset> {
        let css = process(&asset, self.targets, false).map_err(|m| css_error(&asset, m))?;
        Ok(asset.with_contents(css.into_bytes()))
    }
}

/// Minifies CSS without changing its meaning for `targets`.
#[derive(Debug, Clone, Copy)]
pub struct Minify {
    targets: Targets,
}

impl Minify {
    pub fn new(targets: Targets) -> Self {
        Self { targets }
    }
}

impl Transform for Minify {
    fn name(&self) -> &'static str {
        "minify"
    }

    fn apply(&self, asset: Asset) -> Result<Asset> {
        let css = process(&asset, self.targets, true).map_err(|m| css_error(&asset, m))?;
        Ok(asset.with_contents(css.into_bytes()))
    }
}
