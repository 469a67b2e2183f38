// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! Consumes [`RuntimeEvent`]s and produces:
//! - an updated [`WatchState`]
//! - a list of [`CoreCommand`]s describing what the IO shell should do next
//!
//! No channels, no Tokio types, no IO, so it can be tested exhaustively.

use tracing::{debug, info, warn};

use crate::engine::{CompileOutcome, RuntimeEvent};
use crate::types::TriggerWhileRunningBehaviour;

/// Where the watch loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    /// A compile is in flight. `pending` records that sources changed
    /// after it started, so one more compile must follow.
    Compiling { pending: bool },
}

/// Instructions for the IO shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    StartCompile,
}

/// Result of feeding one event into the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    pub keep_running: bool,
}

impl CoreStep {
    fn none() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn compile() -> Self {
        Self {
            commands: vec![CoreCommand::StartCompile],
            keep_running: true,
        }
    }
}

#[derive(Debug)]
pub struct CoreRuntime {
    state: WatchState,
    behaviour: TriggerWhileRunningBehaviour,
    compiles_started: u64,
}

impl CoreRuntime {
    pub fn new(behaviour: TriggerWhileRunningBehaviour) -> Self {
        Self {
            state: WatchState::Idle,
            behaviour,
            compiles_started: 0,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == WatchState::Idle
    }

    pub fn compiles_started(&self) -> u64 {
        self.compiles_started
    }

    /// Handle a single runtime event, updating state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::ChangeDetected { paths } => self.on_change(paths.len()),
            RuntimeEvent::CompileFinished { outcome } => self.on_finished(outcome),
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }

    fn on_change(&mut self, changed: usize) -> CoreStep {
        match (self.state, self.behaviour) {
            (WatchState::Idle, _) => {
                info!(changed, "sources changed; compiling");
                self.start()
            }
            (WatchState::Compiling { .. }, TriggerWhileRunningBehaviour::Queue) => {
                debug!(changed, "change during compile; queued one more run");
                self.state = WatchState::Compiling { pending: true };
                CoreStep::none()
            }
            (WatchState::Compiling { .. }, TriggerWhileRunningBehaviour::Ignore) => {
                debug!(changed, "change during compile; ignored");
                CoreStep::none()
            }
        }
    }

    fn on_finished(&mut self, outcome: CompileOutcome) -> CoreStep {
        match self.state {
            WatchState::Idle => {
                warn!(?outcome, "compile finished while idle; ignoring");
                CoreStep::none()
            }
            WatchState::Compiling { pending } => {
                if outcome == CompileOutcome::Failed {
                    warn!("compile failed; waiting for the next change");
                }
                if pending {
                    debug!("starting queued compile");
                    self.start()
                } else {
                    self.state = WatchState::Idle;
                    CoreStep::none()
                }
            }
        }
    }

    fn start(&mut self) -> CoreStep {
        self.state = WatchState::Compiling { pending: false };
        self.compiles_started += 1;
        CoreStep::compile()
    }
}
