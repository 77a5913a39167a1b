// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::batch::load_batch;
use crate::config::ConfigFile;
use crate::exec::{BatchExecutor, BatchOutcome};
use crate::fs::FileSystem;
use crate::session_log::{SessionLog, timestamp};

use super::core::WatchCore;
use super::{Observation, PollDecision};

/// Result of a single poll tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The command file does not exist.
    Missing,
    /// Metadata lookup failed; skipped until the next tick.
    MetadataError,
    /// The file has not changed since the last dispatched snapshot.
    Unchanged,
    /// The file changed but could not be read.
    LoadFailed,
    /// The file changed but holds no commands.
    Empty,
    /// A batch ran.
    Executed(BatchOutcome),
    /// A batch could not run (the executor returned an error).
    ExecutionFailed,
}

/// Polls the command file and runs one batch per observed change.
///
/// This is the IO shell around [`WatchCore`]: it reads file metadata, loads
/// batches and awaits the executor. A batch is always awaited to completion
/// before the next poll, so executions never overlap.
pub struct Runtime<E: BatchExecutor> {
    core: WatchCore,
    fs: Arc<dyn FileSystem>,
    command_file: PathBuf,
    poll_interval: Duration,
    executor: E,
    log: SessionLog,
}

impl<E: BatchExecutor> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("command_file", &self.command_file)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl<E: BatchExecutor> Runtime<E> {
    pub fn new(config: &ConfigFile, fs: Arc<dyn FileSystem>, executor: E, log: SessionLog) -> Self {
        Self {
            core: WatchCore::new(),
            fs,
            command_file: config.files.commands.clone(),
            poll_interval: config.timing.poll_interval,
            executor,
            log,
        }
    }

    pub fn core(&self) -> &WatchCore {
        &self.core
    }

    /// Poll forever, until `shutdown` resolves.
    ///
    /// Shutdown is honoured both while sleeping and while a batch runs;
    /// in the latter case the in-flight batch is dropped, which kills an
    /// interactive tool process.
    pub async fn run_until<S>(mut self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        info!(
            command_file = ?self.command_file,
            poll_interval = ?self.poll_interval,
            "cmdfeed runtime started"
        );
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                outcome = self.tick() => debug!(?outcome, "poll tick finished"),
                _ = &mut shutdown => break,
            }

            tokio::select! {
                _ = sleep(self.poll_interval) => {}
                _ = &mut shutdown => break,
            }
        }

        info!("shutdown requested; stopping runtime");
    }

    /// One poll: observe the command file and, if it changed, run its batch.
    pub async fn tick(&mut self) -> TickOutcome {
        let observation = self.observe();

        match self.core.step(&observation) {
            PollDecision::Skip => {
                return match observation {
                    Observation::Unreadable(err) => {
                        warn!(path = ?self.command_file, error = %err, "error checking command file");
                        TickOutcome::MetadataError
                    }
                    _ => {
                        debug!(path = ?self.command_file, "command file not present");
                        TickOutcome::Missing
                    }
                };
            }
            PollDecision::Unchanged => return TickOutcome::Unchanged,
            PollDecision::Execute => {}
        }

        info!(path = ?self.command_file, "commands file changed, executing commands");
        self.execute_current().await
    }

    fn observe(&self) -> Observation {
        match self.fs.modified(&self.command_file) {
            Ok(Some(modified)) => Observation::Modified(modified),
            Ok(None) => Observation::Missing,
            Err(err) => Observation::Unreadable(err.to_string()),
        }
    }

    async fn execute_current(&mut self) -> TickOutcome {
        let batch = match load_batch(self.fs.as_ref(), &self.command_file) {
            Ok(batch) => batch,
            Err(err) => {
                error!(path = ?self.command_file, error = %err, "error reading command file");
                return TickOutcome::LoadFailed;
            }
        };

        if batch.is_empty() {
            info!("no commands to execute");
            self.log.append(&format!(
                "No commands found in {} at {}",
                self.command_file.display(),
                timestamp()
            ));
            return TickOutcome::Empty;
        }

        match self.executor.execute(batch).await {
            Ok(outcome) => {
                info!(mode = %outcome.mode(), "batch finished");
                TickOutcome::Executed(outcome)
            }
            Err(err) => {
                error!(error = %err, "error executing commands");
                TickOutcome::ExecutionFailed
            }
        }
    }
}
