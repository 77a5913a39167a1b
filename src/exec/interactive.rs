// src/exec/interactive.rs

//! Interactive session driver.
//!
//! One batch, one long-lived tool process:
//!
//! `Starting -> Initializing -> Dispatching -> Closing -> Completed`
//!
//! with `Aborted` reachable only from `Starting` when the process or one of
//! its pipes cannot be created. Everything after a successful start (a failed
//! write, a non-zero exit, slow output readers) is recorded and the session
//! still completes.

use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::batch::{CommandBatch, tokenize};
use crate::config::ConfigFile;
use crate::errors::{CmdfeedError, Result};
use crate::exec::drain::{DrainOutcome, spawn_drain, wait_for_drains};
use crate::exec::pacing::Pacer;
use crate::session_log::{SessionLog, timestamp};
use crate::types::StreamOrigin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Starting,
    Initializing,
    Dispatching,
    Closing,
    Completed,
    Aborted,
}

/// What happened during one interactive session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub pid: Option<u32>,
    /// Commands (after the first) successfully written to the tool.
    pub commands_sent: usize,
    /// Dispatch stopped early because a write failed.
    pub write_failed: bool,
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// The process outlived `exit_timeout` and was killed.
    pub exit_timed_out: bool,
    /// The output readers did not finish within `drain_timeout`.
    pub drain_timed_out: bool,
}

pub struct InteractiveDriver {
    config: Arc<ConfigFile>,
    log: SessionLog,
    state: SessionState,
}

impl InteractiveDriver {
    pub fn new(config: Arc<ConfigFile>, log: SessionLog) -> Self {
        Self {
            config,
            log,
            state: SessionState::Starting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run `batch` as one interactive session.
    ///
    /// The first command's arguments (minus the tool name) start the tool;
    /// the remaining commands are written to its stdin in order.
    ///
    /// Returns `CmdfeedError::Spawn` only if the tool could not be started.
    pub async fn run(&mut self, batch: &CommandBatch) -> Result<SessionReport> {
        let config = Arc::clone(&self.config);
        let tool = &config.tool;
        let timing = config.timing;
        let mut report = SessionReport::default();

        self.enter(SessionState::Starting);
        let first = batch.first().unwrap_or_default();
        let args: Vec<String> = tokenize(first).into_iter().skip(1).collect();
        info!(
            tool = %tool.name,
            commands = batch.len(),
            ?args,
            "starting interactive session"
        );

        let mut cmd = Command::new(&tool.executable);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = tool.working_dir() {
            cmd.current_dir(dir);
        }

        let mut child = match cmd
            .spawn()
            .with_context(|| format!("spawning {:?}", tool.executable))
        {
            Ok(child) => child,
            Err(err) => return Err(self.abort(format!("{err:#}"))),
        };

        let (stdin, stdout, stderr) =
            match (child.stdin.take(), child.stdout.take(), child.stderr.take()) {
                (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
                _ => return Err(self.abort("could not attach to the process pipes".to_string())),
            };

        self.enter(SessionState::Initializing);
        report.pid = child.id();
        let pid = report
            .pid
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        info!(tool = %tool.name, pid = %pid, "interactive session process started");
        self.log.append(&format!(
            "Interactive {} session started with PID {}",
            tool.name, pid
        ));

        let (mut pacer, prompt) = Pacer::for_session(timing, tool.ready_prompt.as_ref());
        let readers = vec![
            spawn_drain(
                stdout,
                StreamOrigin::Stdout,
                tool.name.clone(),
                self.log.clone(),
                prompt,
            ),
            spawn_drain(
                stderr,
                StreamOrigin::Stderr,
                tool.name.clone(),
                self.log.clone(),
                None,
            ),
        ];

        info!(tool = %tool.name, "waiting for the tool to initialize");
        let settled = pacer.settle().await;
        debug!(?settled, "settle wait finished");

        self.enter(SessionState::Dispatching);
        let mut stdin = stdin;
        self.dispatch(batch, &mut stdin, &mut pacer, &mut report).await;

        self.enter(SessionState::Closing);
        info!(tool = %tool.name, command = %tool.exit_command, "sending exit command");
        if let Err(err) = write_line(&mut stdin, &tool.exit_command).await {
            debug!(error = %err, "exit command could not be written; closing input anyway");
        }
        // Closing stdin is the real end-of-input signal.
        drop(stdin);

        self.wait_for_exit(&mut child, &mut report).await;

        if wait_for_drains(readers, timing.drain_timeout).await == DrainOutcome::TimedOut {
            warn!(
                tool = %tool.name,
                timeout = ?timing.drain_timeout,
                "timeout waiting for output capture to complete"
            );
            report.drain_timed_out = true;
        }

        self.enter(SessionState::Completed);
        let suffix = if report.drain_timed_out {
            " (output capture timed out)"
        } else {
            ""
        };
        let completion = format!(
            "Interactive {} session completed at {}{}",
            tool.name,
            timestamp(),
            suffix
        );
        info!("{}", completion);
        self.log.append(&completion);

        Ok(report)
    }

    async fn dispatch(
        &mut self,
        batch: &CommandBatch,
        stdin: &mut ChildStdin,
        pacer: &mut Pacer,
        report: &mut SessionReport,
    ) {
        let total = batch.len();

        for (offset, command) in batch.rest().iter().enumerate() {
            let index = offset + 2;
            info!(index, total, command = %command, "sending command to tool shell");

            pacer.mark();
            if let Err(err) = write_line(stdin, command).await {
                warn!(index, command = %command, error = %err, "failed to send command");
                self.log.append(&format!(
                    "Failed to send command {}/{}: {} - {}",
                    index, total, command, err
                ));
                report.write_failed = true;
                return;
            }

            report.commands_sent += 1;
            self.log
                .append(&format!("Sent command {}/{}: {}", index, total, command));

            debug!(index, "waiting for command to process");
            pacer.after_command().await;
        }
    }

    async fn wait_for_exit(&mut self, child: &mut Child, report: &mut SessionReport) {
        let name = self.config.tool.name.as_str();

        let status = match self.config.timing.exit_timeout {
            None => child.wait().await,
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    warn!(tool = %name, timeout = ?limit, "tool did not exit in time; killing it");
                    self.log.append(&format!(
                        "{} did not exit within {:?}; killing it",
                        name, limit
                    ));
                    report.exit_timed_out = true;
                    if let Err(err) = child.kill().await {
                        warn!(tool = %name, error = %err, "failed to kill tool process");
                    }
                    return;
                }
            },
        };

        match status {
            Ok(status) => {
                report.exit_code = status.code();
                self.record_exit(status);
            }
            Err(err) => {
                warn!(tool = %name, error = %err, "failed waiting for tool process");
            }
        }
    }

    /// A non-zero exit is logged but never fails the session: the tool is
    /// known to report errors for benign conditions.
    fn record_exit(&self, status: ExitStatus) {
        let name = self.config.tool.name.as_str();
        if status.success() {
            info!(tool = %name, "tool process completed successfully");
        } else {
            warn!(tool = %name, %status, "tool process finished with error");
            self.log
                .append(&format!("{} exited with {}", name, status));
        }
    }

    fn abort(&mut self, reason: String) -> CmdfeedError {
        self.enter(SessionState::Aborted);
        let tool = self.config.tool.name.clone();
        error!(tool = %tool, reason = %reason, "interactive session failed to start");
        self.log.append(&format!(
            "Interactive {} session failed to start: {}",
            tool, reason
        ));
        CmdfeedError::Spawn { tool, reason }
    }

    fn enter(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "interactive session state");
        self.state = next;
    }
}

async fn write_line(stdin: &mut ChildStdin, line: &str) -> std::io::Result<()> {
    stdin.write_all(format!("{line}\n").as_bytes()).await?;
    stdin.flush().await
}
