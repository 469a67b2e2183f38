use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Semaphore, mpsc};

use assetpipe::engine::{CompileOutcome, RuntimeEvent};
use assetpipe::errors::Result;
use assetpipe::exec::CompileBackend;

/// A fake compile backend that:
/// - counts how many compiles were started
/// - reports `CompileFinished(Success)` for each, either immediately or
///   once the test adds a permit to [`FakeCompileBackend::release_handle`].
pub struct FakeCompileBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    started: Arc<AtomicUsize>,
    hold: Option<Arc<Semaphore>>,
}

impl FakeCompileBackend {
    /// Backend whose compiles complete right away.
    pub fn immediate(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            runtime_tx,
            started: Arc::new(AtomicUsize::new(0)),
            hold: None,
        }
    }

    /// Backend whose compiles only complete when released.
    pub fn held(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            hold: Some(Arc::new(Semaphore::new(0))),
            ..Self::immediate(runtime_tx)
        }
    }

    pub fn started(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.started)
    }

    /// Handle used to let held compiles finish, one permit per compile.
    pub fn release_handle(&self) -> Option<Arc<Semaphore>> {
        self.hold.clone()
    }
}

impl CompileBackend for FakeCompileBackend {
    fn start_compile(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let hold = self.hold.clone();
        self.started.fetch_add(1, Ordering::SeqCst);

        Box::pin(async move {
            tokio::spawn(async move {
                if let Some(sem) = hold {
                    if let Ok(permit) = sem.acquire().await {
                        permit.forget();
                    }
                }
                let _ = tx
                    .send(RuntimeEvent::CompileFinished {
                        outcome: CompileOutcome::Success,
                    })
                    .await;
            });
            Ok(())
        })
    }
}
