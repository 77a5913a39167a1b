// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running command batches against
//! the target tool, using `tokio::process::Command`.
//!
//! - [`backend`] provides the `BatchExecutor` trait and the production
//!   `RealBatchExecutor`, which tests can replace with a fake.
//! - [`interactive`] drives one long-lived tool session per batch.
//! - [`individual`] runs each command as its own invocation.
//! - [`drain`] owns the stdout/stderr reader tasks of a session.
//! - [`pacing`] holds the settle and inter-command waits.

pub mod backend;
pub mod drain;
pub mod individual;
pub mod interactive;
pub mod pacing;

pub use backend::{BatchExecutor, BatchOutcome, RealBatchExecutor};
pub use individual::{CommandFailure, IndividualReport, run_individual};
pub use interactive::{InteractiveDriver, SessionReport, SessionState};
pub use pacing::{Pacer, WaitEnd};
