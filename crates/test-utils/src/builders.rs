#![allow(dead_code)]

use assetpipe::config::{ConfigFile, RawConfigFile};
use assetpipe::types::TriggerWhileRunningBehaviour;

/// Builder for `ConfigFile` laid out like a small project:
///
/// ```text
/// sass/main.scss      entry
/// vendor/             include path
/// css/                style output
/// img_src/*           image input
/// img/                image output
/// ```
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.style.entry = "sass/main.scss".to_string();
        config.style.include_paths = vec!["vendor".to_string()];
        config.style.dest = "css".to_string();
        config.image.src = "img_src/*".to_string();
        config.image.dest = "img".to_string();
        config.watch.patterns = vec!["sass/**/*.scss".to_string()];
        config.watch.debounce_ms = 20;
        Self { config }
    }

    pub fn with_image_width(mut self, width: u32) -> Self {
        self.config.image.width = width;
        self
    }

    pub fn with_upscale(mut self, upscale: bool) -> Self {
        self.config.image.upscale = upscale;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.config.style.minify = minify;
        self
    }

    pub fn with_browsers(mut self, queries: &[&str]) -> Self {
        self.config.style.browsers = queries.iter().map(|q| q.to_string()).collect();
        self
    }

    pub fn with_behaviour(mut self, behaviour: TriggerWhileRunningBehaviour) -> Self {
        self.config.watch.triggered_while_running_behaviour = behaviour;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
