// src/exec/pacing.rs

//! Timing between steps of an interactive session.
//!
//! The target tool gives no acknowledgement when it is ready for input, so the
//! driver waits fixed delays. All of that lives here, behind [`Pacer`], so the
//! session state machine only asks "wait for the tool to settle" or "wait for
//! the last command to be processed".
//!
//! When a `ready_prompt` regex is configured, the stdout reader signals each
//! matching line and a wait ends at the first prompt seen, still bounded by
//! the fixed delay.

use std::time::Duration;

use regex::Regex;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::debug;

use crate::config::Timing;

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitEnd {
    /// The full fixed delay elapsed.
    Elapsed,
    /// A ready prompt was observed before the delay ran out.
    PromptSeen,
}

/// Handed to the stdout reader: report lines that look like a ready prompt.
#[derive(Debug)]
pub struct PromptSignal {
    regex: Regex,
    tx: mpsc::UnboundedSender<()>,
}

impl PromptSignal {
    /// Signal the pacer if `line` matches the prompt pattern.
    pub fn observe(&self, line: &str) {
        if self.regex.is_match(line) {
            let _ = self.tx.send(());
        }
    }
}

#[derive(Debug)]
pub struct Pacer {
    timing: Timing,
    prompts: Option<mpsc::UnboundedReceiver<()>>,
}

impl Pacer {
    /// Pure fixed-delay pacing.
    pub fn fixed(timing: Timing) -> Self {
        Self {
            timing,
            prompts: None,
        }
    }

    /// Pacer for one session, plus the signal the stdout reader should feed
    /// when `ready_prompt` is configured.
    pub fn for_session(timing: Timing, ready_prompt: Option<&Regex>) -> (Self, Option<PromptSignal>) {
        match ready_prompt {
            None => (Self::fixed(timing), None),
            Some(regex) => {
                let (tx, rx) = mpsc::unbounded_channel();
                let pacer = Self {
                    timing,
                    prompts: Some(rx),
                };
                let signal = PromptSignal {
                    regex: regex.clone(),
                    tx,
                };
                (pacer, Some(signal))
            }
        }
    }

    /// Forget prompts seen so far. Call right before writing a command so the
    /// following wait only counts prompts printed in response to it.
    pub fn mark(&mut self) {
        if let Some(rx) = self.prompts.as_mut() {
            while rx.try_recv().is_ok() {}
        }
    }

    /// Wait for the freshly started tool to reach its prompt.
    pub async fn settle(&mut self) -> WaitEnd {
        let max = self.timing.settle_delay;
        self.wait(max).await
    }

    /// Wait for the command just written to be processed.
    pub async fn after_command(&mut self) -> WaitEnd {
        let max = self.timing.inter_command_delay;
        self.wait(max).await
    }

    async fn wait(&mut self, max: Duration) -> WaitEnd {
        let Some(rx) = self.prompts.as_mut() else {
            sleep(max).await;
            return WaitEnd::Elapsed;
        };

        // A closed channel (stdout ended) disables the prompt branch.
        tokio::select! {
            _ = sleep(max) => WaitEnd::Elapsed,
            Some(()) = rx.recv() => {
                debug!("ready prompt observed; ending wait early");
                WaitEnd::PromptSeen
            }
        }
    }
}
