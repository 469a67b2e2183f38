// src/config/model.rs

use serde::Deserialize;

use crate::types::TriggerWhileRunningBehaviour;

/// Top-level configuration as read from `Assetpipe.toml`.
///
/// ```toml
/// [style]
/// entry = "src/static/sass/main.scss"
/// include_paths = ["node_modules/normalize.css/"]
/// dest = "src/static/css"
///
/// [image]
/// src = "src/static/img_src/*"
/// dest = "src/static/img"
/// width = 1260
///
/// [watch]
/// patterns = ["src/static/sass/**/*.scss"]
/// ```
///
/// All sections are optional. Relative paths are resolved against the
/// directory holding the config file.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub style: StyleSection,

    #[serde(default)]
    pub image: ImageSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    style: StyleSection,
    image: ImageSection,
    watch: WatchSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            style: raw.style,
            image: raw.image,
            watch: raw.watch,
        }
    }

    pub fn style(&self) -> &StyleSection {
        &self.style
    }

    pub fn image(&self) -> &ImageSection {
        &self.image
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}

/// `[style]` section: the stylesheet build.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleSection {
    /// Entry stylesheet; every import is resolved from here.
    #[serde(default = "default_style_entry")]
    pub entry: String,

    /// Extra directories searched for imports that are not found relative
    /// to the importing file.
    #[serde(default = "default_include_paths")]
    pub include_paths: Vec<String>,

    /// Output directory for the compiled CSS.
    #[serde(default = "default_style_dest")]
    pub dest: String,

    /// Browserslist queries that decide which vendor prefixes are emitted.
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,

    #[serde(default = "default_true")]
    pub minify: bool,
}

fn default_style_entry() -> String {
    "src/static/sass/main.scss".to_string()
}

fn default_include_paths() -> Vec<String> {
    vec!["node_modules/normalize.css/".to_string()]
}

fn default_style_dest() -> String {
    "src/static/css".to_string()
}

fn default_browsers() -> Vec<String> {
    vec!["defaults".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            entry: default_style_entry(),
            include_paths: default_include_paths(),
            dest: default_style_dest(),
            browsers: default_browsers(),
            minify: true,
        }
    }
}

/// `[image]` section: the image build.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSection {
    /// Glob selecting the source images. `*` does not descend into
    /// subdirectories; use `**` for that.
    #[serde(default = "default_image_src")]
    pub src: String,

    #[serde(default = "default_image_dest")]
    pub dest: String,

    /// Maximum output width in pixels.
    #[serde(default = "default_image_width")]
    pub width: u32,

    /// Whether images narrower than `width` are enlarged to it.
    #[serde(default)]
    pub upscale: bool,

    /// JPEG quality used when re-encoding (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_image_src() -> String {
    "src/static/img_src/*".to_string()
}

fn default_image_dest() -> String {
    "src/static/img".to_string()
}

fn default_image_width() -> u32 {
    1260
}

fn default_jpeg_quality() -> u8 {
    75
}

impl Default for ImageSection {
    fn default() -> Self {
        Self {
            src: default_image_src(),
            dest: default_image_dest(),
            width: default_image_width(),
            upscale: false,
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

/// `[watch]` section: which changes re-run the stylesheet build.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    #[serde(default = "default_watch_patterns")]
    pub patterns: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// `"queue"` (default) or `"ignore"`.
    #[serde(default)]
    pub triggered_while_running_behaviour: TriggerWhileRunningBehaviour,

    /// Quiet period used to fold a burst of filesystem events into one
    /// trigger.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Only trigger when the content of the watched files actually changed.
    #[serde(default)]
    pub use_hash: bool,
}

fn default_watch_patterns() -> Vec<String> {
    vec!["src/static/sass/**/*.scss".to_string()]
}

fn default_debounce_ms() -> u64 {
    50
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            patterns: default_watch_patterns(),
            exclude: Vec::new(),
            triggered_while_running_behaviour: TriggerWhileRunningBehaviour::default(),
            debounce_ms: default_debounce_ms(),
            use_hash: false,
        }
    }
}
