// src/batch/mod.rs

//! Command batches: loading them from the command file and deciding how
//! they run.

pub mod classify;
pub mod loader;

pub use classify::classify;
pub use loader::{load_batch, parse_batch};

/// Ordered, non-empty, non-comment commands from one snapshot of the command
/// file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandBatch {
    commands: Vec<String>,
}

impl CommandBatch {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn first(&self) -> Option<&str> {
        self.commands.first().map(String::as_str)
    }

    /// Everything after the first command (what gets typed into a session).
    pub fn rest(&self) -> &[String] {
        self.commands.get(1..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Split a command into whitespace-delimited tokens.
pub fn tokenize(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
