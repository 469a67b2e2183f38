// src/watch/mod.rs

//! File watching and change detection for the stylesheet rebuild.
//!
//! This module is responsible for:
//! - Compiling `watch` / `exclude` glob patterns.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Folding event bursts into one trigger and, optionally, skipping
//!   triggers when the watched content hash did not change.
//!
//! It does **not** know what a compile is; it only turns filesystem changes
//! into [`RuntimeEvent::ChangeDetected`](crate::engine::RuntimeEvent).

pub mod hash;
pub mod patterns;
pub mod watcher;

pub use hash::{HashGate, compute_hash_for_paths};
pub use patterns::{WatchProfile, collect_matching_files};
pub use watcher::{WatcherHandle, spawn_watcher};
