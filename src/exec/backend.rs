// src/exec/backend.rs

//! Pluggable batch executor abstraction.
//!
//! The poll loop hands each non-empty batch to a `BatchExecutor` instead of
//! spawning processes itself. This makes it easy to swap in a fake executor
//! in tests while keeping the production implementation here.
//!
//! - `RealBatchExecutor` classifies the batch and runs it either through the
//!   [`InteractiveDriver`] or through [`run_individual`].
//! - Tests can provide their own `BatchExecutor` that, for example, records
//!   which batches were handed over.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::info;

use crate::batch::{CommandBatch, classify};
use crate::config::ConfigFile;
use crate::errors::Result;
use crate::exec::individual::{IndividualReport, run_individual};
use crate::exec::interactive::{InteractiveDriver, SessionReport};
use crate::session_log::{SessionLog, timestamp};
use crate::types::ExecutionMode;

/// How a batch ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Interactive(SessionReport),
    Individual(IndividualReport),
}

impl BatchOutcome {
    pub fn mode(&self) -> ExecutionMode {
        match self {
            BatchOutcome::Interactive(_) => ExecutionMode::Interactive,
            BatchOutcome::Individual(_) => ExecutionMode::Individual,
        }
    }
}

/// Trait abstracting how one command batch is executed.
pub trait BatchExecutor: Send {
    /// Execute a non-empty batch to completion.
    ///
    /// An `Err` means the batch could not run at all (e.g. the interactive
    /// tool failed to start); everything else is reported in the outcome.
    fn execute(
        &mut self,
        batch: CommandBatch,
    ) -> Pin<Box<dyn Future<Output = Result<BatchOutcome>> + Send + '_>>;
}

/// Real executor backend used in production.
pub struct RealBatchExecutor {
    config: Arc<ConfigFile>,
    log: SessionLog,
}

impl RealBatchExecutor {
    pub fn new(config: Arc<ConfigFile>, log: SessionLog) -> Self {
        Self { config, log }
    }
}

impl BatchExecutor for RealBatchExecutor {
    fn execute(
        &mut self,
        batch: CommandBatch,
    ) -> Pin<Box<dyn Future<Output = Result<BatchOutcome>> + Send + '_>> {
        Box::pin(async move {
            self.log.append(&format!(
                "Starting execution of {} commands at {}",
                batch.len(),
                timestamp()
            ));

            match classify(&batch, &self.config.tool.name) {
                ExecutionMode::Interactive => {
                    info!(tool = %self.config.tool.name, "detected tool command; starting interactive session");
                    let mut driver =
                        InteractiveDriver::new(Arc::clone(&self.config), self.log.clone());
                    let report = driver.run(&batch).await?;
                    Ok(BatchOutcome::Interactive(report))
                }
                ExecutionMode::Individual => {
                    info!(tool = %self.config.tool.name, "no tool command detected; using individual execution");
                    let report = run_individual(&self.config, &self.log, &batch).await;
                    Ok(BatchOutcome::Individual(report))
                }
            }
        })
    }
}
