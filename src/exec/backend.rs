// src/exec/backend.rs

//! Pluggable compile backend.
//!
//! The runtime asks a `CompileBackend` to start a compile and later
//! receives `RuntimeEvent::CompileFinished` on its event channel. Tests swap
//! in a backend that records calls and reports completion without touching
//! the filesystem.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::engine::{CompileOutcome, RuntimeEvent};
use crate::errors::Result;
use crate::style::StyleTask;

pub trait CompileBackend: Send {
    /// Start one compile in the background.
    ///
    /// Must return promptly; completion is reported as a
    /// `RuntimeEvent::CompileFinished` on the runtime channel.
    fn start_compile(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: runs the [`StyleTask`] on a blocking thread.
#[derive(Debug)]
pub struct StyleCompileBackend {
    task: Arc<StyleTask>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl StyleCompileBackend {
    pub fn new(task: Arc<StyleTask>, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { task, runtime_tx }
    }
}

impl CompileBackend for StyleCompileBackend {
    fn start_compile(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let task = Arc::clone(&self.task);
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                let outcome = match tokio::task::spawn_blocking(move || task.run()).await {
                    Ok(Ok(_report)) => CompileOutcome::Success,
                    // Already logged by the task itself.
                    Ok(Err(_)) => CompileOutcome::Failed,
                    Err(join_err) => {
                        error!("compile thread panicked: {join_err}");
                        CompileOutcome::Failed
                    }
                };
                if tx
                    .send(RuntimeEvent::CompileFinished { outcome })
                    .await
                    .is_err()
                {
                    debug!("runtime gone before compile finished");
                }
            });
            Ok(())
        })
    }
}
