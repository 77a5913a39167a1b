// src/exec/drain.rs

//! Output readers for an interactive session.
//!
//! One task per pipe reads lines until end-of-stream and records each one in
//! the session log, tagged with its origin. The driver waits for both with a
//! bound and abandons (never aborts) a reader that does not finish in time.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::exec::pacing::PromptSignal;
use crate::session_log::SessionLog;
use crate::types::StreamOrigin;

/// Spawn a reader for one output pipe. The task yields the number of lines
/// it recorded.
///
/// Lines are read as raw bytes and decoded lossily: a line that is not valid
/// UTF-8 is recorded with replacement characters and reading continues, so
/// the pipe stays open until the tool closes it.
pub fn spawn_drain<R>(
    stream: R,
    origin: StreamOrigin,
    tool: String,
    log: SessionLog,
    prompt: Option<PromptSignal>,
) -> JoinHandle<usize>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let mut count = 0;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(tool = %tool, stream = %origin, error = %err, "failed reading tool output");
                    break;
                }
            }

            let line = String::from_utf8_lossy(strip_line_ending(&buf));
            info!(tool = %tool, stream = %origin, "{}", line);
            log.append(&format!("{} {}: {}", tool, origin, line));
            if let Some(prompt) = &prompt {
                prompt.observe(&line);
            }
            count += 1;
        }

        debug!(tool = %tool, stream = %origin, lines = count, "output reader finished");
        count
    })
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Result of waiting for the output readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    Completed,
    TimedOut,
}

/// Wait for every reader to finish, giving up after `bound`.
///
/// On timeout the remaining handles are dropped, which detaches the tasks;
/// they keep running and may still append to the log afterwards.
pub async fn wait_for_drains(handles: Vec<JoinHandle<usize>>, bound: Duration) -> DrainOutcome {
    let all = async {
        for handle in handles {
            if let Err(err) = handle.await {
                debug!(error = %err, "output reader task failed");
            }
        }
    };

    match timeout(bound, all).await {
        Ok(()) => DrainOutcome::Completed,
        Err(_) => DrainOutcome::TimedOut,
    }
}
