// src/engine/core.rs

//! Pure watch state.
//!
//! The only memory the poll loop keeps is the modification time of the last
//! snapshot it dispatched. This module owns that value and has **no** Tokio
//! types, filesystem access, or processes, so it can be tested directly.

use std::time::SystemTime;

use tracing::debug;

use crate::engine::{Observation, PollDecision};

#[derive(Debug, Default)]
pub struct WatchCore {
    /// `None` until the first dispatch: any observed time is newer.
    last_modified: Option<SystemTime>,
}

impl WatchCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    /// Feed one observation and decide what to do.
    ///
    /// The watermark only moves forward, and only when the decision is
    /// [`PollDecision::Execute`].
    pub fn step(&mut self, observation: &Observation) -> PollDecision {
        match observation {
            Observation::Missing | Observation::Unreadable(_) => PollDecision::Skip,
            Observation::Modified(modified) => {
                let newer = self.last_modified.is_none_or(|last| *modified > last);
                if newer {
                    debug!(?modified, previous = ?self.last_modified, "command file changed");
                    self.last_modified = Some(*modified);
                    PollDecision::Execute
                } else {
                    PollDecision::Unchanged
                }
            }
        }
    }
}
