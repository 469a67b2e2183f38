// src/engine/mod.rs

//! Watch-mode engine.
//!
//! This module ties together:
//! - the Idle/Compiling state machine deciding when a compile starts
//! - the async event loop that reacts to:
//!   - file-watch triggers
//!   - compile completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

/// Outcome of one stylesheet compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutcome {
    Success,
    Failed,
}

/// Events flowing into the runtime from the watcher, the compile backend,
/// and the signal handler.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Watched sources changed.
    ChangeDetected { paths: Vec<PathBuf> },
    /// The in-flight compile finished.
    CompileFinished { outcome: CompileOutcome },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod runtime;

pub use self::core::{CoreCommand, CoreRuntime, CoreStep, WatchState};
pub use crate::types::TriggerWhileRunningBehaviour;
pub use runtime::Runtime;
