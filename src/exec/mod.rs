// src/exec/mod.rs

//! Running compiles on behalf of the watch runtime.

pub mod backend;

pub use backend::{CompileBackend, StyleCompileBackend};
