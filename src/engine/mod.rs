// src/engine/mod.rs

//! Change-detection engine for cmdfeed.
//!
//! The pure watch state lives in [`core`]: it decides, from one observation
//! of the command file, whether a batch must run. The async/IO shell in
//! [`runtime`] polls the file on a fixed interval, loads the batch and hands
//! it to a [`crate::exec::BatchExecutor`], one batch at a time.

use std::time::SystemTime;

/// What one poll saw of the command file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// The file does not exist (a transient condition, not an error).
    Missing,
    /// Metadata could not be read for another reason.
    Unreadable(String),
    /// The file exists with this modification time.
    Modified(SystemTime),
}

/// Decision taken by the core for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    /// The file is newer than anything seen before: run it.
    Execute,
    /// Same (or older) timestamp as the last executed snapshot.
    Unchanged,
    /// Nothing to look at this tick.
    Skip,
}

pub mod core;
pub mod runtime;

pub use core::WatchCore;
pub use runtime::{Runtime, TickOutcome};
