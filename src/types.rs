use std::fmt;

/// How a command batch is executed, decided once from its first command.
///
/// - `Interactive`: the first command launches the tool; the rest are typed
///   into its shell over stdin.
/// - `Individual`: every command is a separate invocation of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Interactive,
    Individual,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Interactive => f.write_str("interactive"),
            ExecutionMode::Individual => f.write_str("individual"),
        }
    }
}

/// Which output pipe of the interactive tool a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOrigin {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamOrigin::Stdout => f.write_str("stdout"),
            StreamOrigin::Stderr => f.write_str("stderr"),
        }
    }
}
