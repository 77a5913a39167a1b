// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [tool]
/// executable = "/opt/tibco/bw/bin/bwdesign"
/// name = "bwdesign"
///
/// [files]
/// commands = "data/commands.txt"
/// log = "data/execution.log"
///
/// [timing]
/// poll_interval = "5s"
/// settle_delay = "5s"
/// ```
///
/// `[tool]` and `[files]` are required; `[timing]` falls back to the
/// reference delays. Convert into [`ConfigFile`] with `TryFrom` to validate.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub tool: RawToolSection,

    pub files: RawFilesSection,

    #[serde(default)]
    pub timing: RawTimingSection,
}

/// `[tool]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawToolSection {
    /// Path to the target tool's executable.
    pub executable: String,

    /// Invocation name matched against the first token of a batch.
    ///
    /// If `None`, the file stem of `executable` is used.
    #[serde(default)]
    pub name: Option<String>,

    /// Command written to the tool's shell to end an interactive session.
    #[serde(default = "default_exit_command")]
    pub exit_command: String,

    /// Optional regex matched against stdout lines; a match means the shell is
    /// ready for the next command, which ends the current wait early.
    #[serde(default)]
    pub ready_prompt: Option<String>,
}

/// `[files]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFilesSection {
    /// The command file written by the upstream producer.
    pub commands: String,

    /// The append-only session log.
    pub log: String,
}

/// `[timing]` section. Every value is a duration string such as `"5s"`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimingSection {
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Wait after starting an interactive session before the first command.
    #[serde(default = "default_settle_delay")]
    pub settle_delay: String,

    /// Wait after each command written to an interactive session.
    #[serde(default = "default_inter_command_delay")]
    pub inter_command_delay: String,

    /// Wait between successful invocations in individual mode.
    #[serde(default = "default_individual_command_delay")]
    pub individual_command_delay: String,

    /// Bound on waiting for the output readers after the tool exits.
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout: String,

    /// Bound on waiting for the tool to exit once its input is closed.
    ///
    /// If `None`, the wait is unbounded.
    #[serde(default)]
    pub exit_timeout: Option<String>,
}

fn default_exit_command() -> String {
    "exit".to_string()
}

fn default_poll_interval() -> String {
    "5s".to_string()
}

fn default_settle_delay() -> String {
    "5s".to_string()
}

fn default_inter_command_delay() -> String {
    "3s".to_string()
}

fn default_individual_command_delay() -> String {
    "2s".to_string()
}

fn default_drain_timeout() -> String {
    "5s".to_string()
}

impl Default for RawTimingSection {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            settle_delay: default_settle_delay(),
            inter_command_delay: default_inter_command_delay(),
            individual_command_delay: default_individual_command_delay(),
            drain_timeout: default_drain_timeout(),
            exit_timeout: None,
        }
    }
}

/// Validated, resolved configuration handed to every component.
///
/// Only constructible through `TryFrom<RawConfigFile>` (or
/// [`ConfigFile::new_unchecked`] from already-resolved parts).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub tool: ToolSettings,
    pub files: FileSettings,
    pub timing: Timing,
}

#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub executable: PathBuf,
    pub name: String,
    pub exit_command: String,
    pub ready_prompt: Option<Regex>,
}

#[derive(Debug, Clone)]
pub struct FileSettings {
    pub commands: PathBuf,
    pub log: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub poll_interval: Duration,
    pub settle_delay: Duration,
    pub inter_command_delay: Duration,
    pub individual_command_delay: Duration,
    pub drain_timeout: Duration,
    pub exit_timeout: Option<Duration>,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            settle_delay: Duration::from_secs(5),
            inter_command_delay: Duration::from_secs(3),
            individual_command_delay: Duration::from_secs(2),
            drain_timeout: Duration::from_secs(5),
            exit_timeout: None,
        }
    }
}

impl ConfigFile {
    pub fn new_unchecked(tool: ToolSettings, files: FileSettings, timing: Timing) -> Self {
        Self {
            tool,
            files,
            timing,
        }
    }
}

impl ToolSettings {
    /// Directory the tool is started in: the one containing its executable.
    ///
    /// `None` for a bare executable name, in which case the child inherits
    /// our working directory.
    pub fn working_dir(&self) -> Option<&Path> {
        self.executable
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }
}
