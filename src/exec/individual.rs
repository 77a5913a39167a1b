// src/exec/individual.rs

//! Fallback executor: one tool invocation per command, in order, stopping at
//! the first failure.

use std::process::Stdio;

use tokio::process::Command;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::batch::{CommandBatch, tokenize};
use crate::config::ConfigFile;
use crate::session_log::SessionLog;

/// The command that stopped an individual-mode batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// 1-based position in the batch.
    pub index: usize,
    pub command: String,
    /// `None` when the process could not be started or was killed by a signal.
    pub exit_code: Option<i32>,
    pub reason: String,
    /// Captured stdout followed by stderr.
    pub output: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndividualReport {
    /// Number of commands that completed successfully.
    pub completed: usize,
    pub failure: Option<CommandFailure>,
}

/// Run every command of `batch` as `<executable> <tokens...>`.
///
/// Commands after a failing one never run. Between successful invocations
/// the configured `individual_command_delay` is observed.
pub async fn run_individual(
    config: &ConfigFile,
    log: &SessionLog,
    batch: &CommandBatch,
) -> IndividualReport {
    let total = batch.len();
    let mut report = IndividualReport::default();

    for (offset, command) in batch.commands().iter().enumerate() {
        let index = offset + 1;
        if offset > 0 {
            sleep(config.timing.individual_command_delay).await;
        }

        info!(index, total, command = %command, "executing individual command");

        match invoke(config, command).await {
            Ok(output) => {
                let success = format!("Command {} completed successfully: {}", index, command);
                info!("{}", success);
                log.append(&success);
                if !output.trim().is_empty() {
                    log.append(&format!("Command output: {}", output.trim_end()));
                }
                report.completed += 1;
            }
            Err((exit_code, reason, output)) => {
                let failure = CommandFailure {
                    index,
                    command: command.clone(),
                    exit_code,
                    reason,
                    output,
                };
                let message = format!(
                    "Command {} failed: {} - {}, output: {}",
                    failure.index,
                    failure.command,
                    failure.reason,
                    failure.output.trim_end()
                );
                warn!("{}", message);
                log.append(&message);
                report.failure = Some(failure);
                break;
            }
        }
    }

    report
}

type InvokeError = (Option<i32>, String, String);

async fn invoke(config: &ConfigFile, command: &str) -> Result<String, InvokeError> {
    let tool = &config.tool;

    let mut cmd = Command::new(&tool.executable);
    cmd.args(tokenize(command))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = tool.working_dir() {
        cmd.current_dir(dir);
    }

    let output = cmd.output().await.map_err(|err| {
        (
            None,
            format!("failed to start {:?}: {}", tool.executable, err),
            String::new(),
        )
    })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        Ok(combined)
    } else {
        Err((output.status.code(), output.status.to_string(), combined))
    }
}
