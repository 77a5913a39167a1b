// src/batch/loader.rs

use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::batch::CommandBatch;
use crate::errors::Result;
use crate::fs::FileSystem;

/// Marker that turns a line into a comment when it is the first
/// non-whitespace character.
pub const COMMENT_MARKER: char = '#';

/// Read the command file at `path` into a [`CommandBatch`].
///
/// Fails with `IoError` if the file cannot be opened or a read fails midway
/// (including invalid UTF-8). An empty batch is not an error.
pub fn load_batch(fs: &dyn FileSystem, path: &Path) -> Result<CommandBatch> {
    let reader = fs.open_lines(path)?;
    let batch = read_batch(reader)?;
    debug!(path = ?path, commands = batch.len(), "loaded command batch");
    Ok(batch)
}

/// Parse a batch from in-memory text.
pub fn parse_batch(text: &str) -> CommandBatch {
    CommandBatch::new(text.lines().filter_map(command_from_line).collect())
}

fn read_batch(reader: Box<dyn BufRead + Send>) -> Result<CommandBatch> {
    let mut commands = Vec::new();
    for line in reader.lines() {
        if let Some(cmd) = command_from_line(&line?) {
            commands.push(cmd);
        }
    }
    Ok(CommandBatch::new(commands))
}

fn command_from_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_MARKER) {
        None
    } else {
        Some(line.to_string())
    }
}
