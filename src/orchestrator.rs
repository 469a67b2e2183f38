// src/orchestrator.rs

//! Named entry points: `css`, `img`, `watch`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::ConfigFile;
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::{AssetpipeError, Result};
use crate::exec::StyleCompileBackend;
use crate::fs::FileSystem;
use crate::images::ImageTask;
use crate::pipeline::RunReport;
use crate::style::StyleTask;
use crate::watch::watcher::WatchOptions;
use crate::watch::{WatchProfile, spawn_watcher};

/// A resolved config bound to a project root and a filesystem.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ConfigFile,
    fs: Arc<dyn FileSystem>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: ConfigFile, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            config,
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn style_task(&self) -> Result<StyleTask> {
        StyleTask::new(&self.root, self.config.style(), Arc::clone(&self.fs))
    }

    pub fn image_task(&self) -> Result<ImageTask> {
        ImageTask::new(&self.root, self.config.image(), Arc::clone(&self.fs))
    }

    pub fn watch_profile(&self) -> Result<WatchProfile> {
        Ok(WatchProfile::from_config(self.config.watch())?)
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AssetpipeError::Other(anyhow::anyhow!("build thread failed: {e}")))?
}

/// `css`: compile the entry stylesheet once.
pub async fn run_css(project: &Project) -> Result<RunReport> {
    let task = project.style_task()?;
    blocking(move || task.run()).await
}

/// `img`: resize and optimize every source image once.
pub async fn run_img(project: &Project) -> Result<RunReport> {
    let task = project.image_task()?;
    blocking(move || task.run()).await
}

/// Run both builds concurrently. Either may fail without affecting the other.
pub async fn build_all(project: &Project) -> (Result<RunReport>, Result<RunReport>) {
    tokio::join!(run_css(project), run_img(project))
}

/// `watch` (and the default entry): build everything once, then recompile
/// styles whenever watched sources change, until Ctrl-C.
pub async fn run_watch(project: &Project) -> Result<()> {
    run_watch_until(project, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Like [`run_watch`], but stops when `shutdown` completes.
///
/// Failed initial builds are logged; watching starts regardless.
pub async fn run_watch_until<F>(project: &Project, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (css, img) = build_all(project).await;
    if let Err(e) = css {
        error!("initial stylesheet build failed: {e}");
    }
    if let Err(e) = img {
        error!("initial image build failed: {e}");
    }

    let watch_cfg = project.config.watch();
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let _watcher = spawn_watcher(
        project.root.clone(),
        project.watch_profile()?,
        WatchOptions {
            debounce: Duration::from_millis(watch_cfg.debounce_ms),
            use_hash: watch_cfg.use_hash,
        },
        Arc::clone(&project.fs),
        rt_tx.clone(),
    )?;

    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            shutdown.await;
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let backend = StyleCompileBackend::new(Arc::new(project.style_task()?), rt_tx);
    let core = CoreRuntime::new(watch_cfg.triggered_while_running_behaviour);
    let core = Runtime::new(core, rt_rx, backend).run().await?;

    info!(compiles = core.compiles_started(), "watch stopped");
    Ok(())
}

/// Human-readable description of what each entry point would do.
pub fn describe(project: &Project) -> String {
    let cfg = project.config();
    let style = cfg.style();
    let image = cfg.image();
    let watch = cfg.watch();
    let root = project.root();

    let mut out = String::new();
    out.push_str("assetpipe dry-run\n");
    out.push_str(&format!("  root = {}\n\n", root.display()));
    out.push_str("css:\n");
    out.push_str(&format!("  entry: {}\n", root.join(&style.entry).display()));
    for inc in style.include_paths.iter() {
        out.push_str(&format!("  include: {}\n", root.join(inc).display()));
    }
    out.push_str(&format!("  browsers: {:?}\n", style.browsers));
    out.push_str(&format!(
        "  steps: sass -> autoprefix{}\n",
        if style.minify { " -> minify" } else { "" }
    ));
    out.push_str(&format!("  dest: {}\n\n", root.join(&style.dest).display()));
    out.push_str("img:\n");
    out.push_str(&format!("  src: {}\n", image.src));
    out.push_str(&format!(
        "  resize: width {} (upscale: {})\n",
        image.width, image.upscale
    ));
    out.push_str(&format!("  jpeg_quality: {}\n", image.jpeg_quality));
    out.push_str(&format!("  dest: {}\n\n", root.join(&image.dest).display()));
    out.push_str("watch:\n");
    out.push_str(&format!("  patterns: {:?}\n", watch.patterns));
    if !watch.exclude.is_empty() {
        out.push_str(&format!("  exclude: {:?}\n", watch.exclude));
    }
    out.push_str(&format!(
        "  triggered_while_running_behaviour: {:?}\n",
        watch.triggered_while_running_behaviour
    ));
    out.push_str(&format!("  debounce_ms: {}\n", watch.debounce_ms));
    out.push_str(&format!("  use_hash: {}\n", watch.use_hash));
    out
}
