// src/batch/classify.rs

use crate::batch::CommandBatch;
use crate::types::ExecutionMode;

/// Decide how a batch runs by looking only at its first command.
///
/// A batch is `Interactive` when the leading token of its first command is
/// exactly `tool_name`; anything else (including `bwdesignx` for a tool named
/// `bwdesign`, or an empty batch) is `Individual`.
pub fn classify(batch: &CommandBatch, tool_name: &str) -> ExecutionMode {
    let leading = batch
        .first()
        .and_then(|cmd| cmd.split_whitespace().next());

    match leading {
        Some(token) if token == tool_name => ExecutionMode::Interactive,
        _ => ExecutionMode::Individual,
    }
}
