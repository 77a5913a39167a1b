#![allow(dead_code)]

use std::path::Path;

use cmdfeed::config::{
    ConfigFile, RawConfigFile, RawFilesSection, RawTimingSection, RawToolSection,
};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from millisecond-scale timings so subprocess tests stay fast.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new(executable: impl AsRef<Path>) -> Self {
        Self {
            config: RawConfigFile {
                tool: RawToolSection {
                    executable: executable.as_ref().to_string_lossy().into_owned(),
                    name: None,
                    exit_command: "exit".to_string(),
                    ready_prompt: None,
                },
                files: RawFilesSection {
                    commands: "commands.txt".to_string(),
                    log: "execution.log".to_string(),
                },
                timing: RawTimingSection {
                    poll_interval: "10ms".to_string(),
                    settle_delay: "100ms".to_string(),
                    inter_command_delay: "50ms".to_string(),
                    individual_command_delay: "0ms".to_string(),
                    drain_timeout: "2s".to_string(),
                    exit_timeout: None,
                },
            },
        }
    }

    pub fn tool_name(mut self, name: &str) -> Self {
        self.config.tool.name = Some(name.to_string());
        self
    }

    pub fn exit_command(mut self, cmd: &str) -> Self {
        self.config.tool.exit_command = cmd.to_string();
        self
    }

    pub fn ready_prompt(mut self, pattern: &str) -> Self {
        self.config.tool.ready_prompt = Some(pattern.to_string());
        self
    }

    pub fn commands_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config.files.commands = path.as_ref().to_string_lossy().into_owned();
        self
    }

    pub fn log_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config.files.log = path.as_ref().to_string_lossy().into_owned();
        self
    }

    pub fn settle_delay(mut self, d: &str) -> Self {
        self.config.timing.settle_delay = d.to_string();
        self
    }

    pub fn inter_command_delay(mut self, d: &str) -> Self {
        self.config.timing.inter_command_delay = d.to_string();
        self
    }

    pub fn individual_command_delay(mut self, d: &str) -> Self {
        self.config.timing.individual_command_delay = d.to_string();
        self
    }

    pub fn drain_timeout(mut self, d: &str) -> Self {
        self.config.timing.drain_timeout = d.to_string();
        self
    }

    pub fn exit_timeout(mut self, d: &str) -> Self {
        self.config.timing.exit_timeout = Some(d.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
