// src/config/validate.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;

use crate::config::duration::parse_duration;
use crate::config::model::{
    ConfigFile, FileSettings, RawConfigFile, RawFilesSection, RawTimingSection, RawToolSection,
    Timing, ToolSettings,
};
use crate::errors::{CmdfeedError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::CmdfeedError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let tool = resolve_tool(&raw.tool)?;
        let files = resolve_files(&raw.files)?;
        let timing = resolve_timing(&raw.timing)?;
        Ok(ConfigFile::new_unchecked(tool, files, timing))
    }
}

fn resolve_tool(raw: &RawToolSection) -> Result<ToolSettings> {
    let executable = raw.executable.trim();
    if executable.is_empty() {
        return Err(CmdfeedError::ConfigError(
            "[tool].executable must not be empty".to_string(),
        ));
    }
    let executable = resolve_executable(executable)?;

    let name = match raw.name.as_deref().map(str::trim) {
        Some(name) if name.is_empty() => {
            return Err(CmdfeedError::ConfigError(
                "[tool].name must not be empty when given".to_string(),
            ));
        }
        Some(name) if name.contains(char::is_whitespace) => {
            return Err(CmdfeedError::ConfigError(format!(
                "[tool].name '{}' must be a single token",
                name
            )));
        }
        Some(name) => name.to_string(),
        None => invocation_name(&executable)?,
    };

    let exit_command = raw.exit_command.trim();
    if exit_command.is_empty() {
        return Err(CmdfeedError::ConfigError(
            "[tool].exit_command must not be empty".to_string(),
        ));
    }

    let ready_prompt = raw
        .ready_prompt
        .as_deref()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                CmdfeedError::ConfigError(format!(
                    "[tool].ready_prompt '{}' is not a valid regex: {}",
                    pattern, e
                ))
            })
        })
        .transpose()?;

    Ok(ToolSettings {
        executable,
        name,
        exit_command: exit_command.to_string(),
        ready_prompt,
    })
}

/// Anchor a relative executable path (`bin/tool`) to the current directory.
///
/// The tool is started inside its own directory, so a relative path would
/// otherwise be ambiguous. Bare names (`tool`) are left for `PATH` lookup.
fn resolve_executable(executable: &str) -> Result<PathBuf> {
    let path = PathBuf::from(executable);
    let has_dir = path
        .parent()
        .is_some_and(|p| !p.as_os_str().is_empty());
    if path.is_absolute() || !has_dir {
        return Ok(path);
    }
    std::path::absolute(&path).map_err(|e| {
        CmdfeedError::ConfigError(format!(
            "cannot resolve [tool].executable {:?}: {}",
            path, e
        ))
    })
}

/// Derive the invocation name from the executable's file stem, so that
/// `/opt/bw/bin/bwdesign` and `C:\bw\bin\bwdesign.exe` both yield `bwdesign`.
fn invocation_name(executable: &Path) -> Result<String> {
    executable
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CmdfeedError::ConfigError(format!(
                "cannot derive a tool name from executable {:?}; set [tool].name",
                executable
            ))
        })
}

fn resolve_files(raw: &RawFilesSection) -> Result<FileSettings> {
    Ok(FileSettings {
        commands: non_empty_path("[files].commands", &raw.commands)?,
        log: non_empty_path("[files].log", &raw.log)?,
    })
}

fn non_empty_path(key: &str, value: &str) -> Result<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CmdfeedError::ConfigError(format!(
            "{} must not be empty",
            key
        )));
    }
    Ok(PathBuf::from(value))
}

fn resolve_timing(raw: &RawTimingSection) -> Result<Timing> {
    let poll_interval = duration_field("poll_interval", &raw.poll_interval)?;
    if poll_interval.is_zero() {
        return Err(CmdfeedError::ConfigError(
            "[timing].poll_interval must be greater than zero".to_string(),
        ));
    }

    let exit_timeout = raw
        .exit_timeout
        .as_deref()
        .map(|s| duration_field("exit_timeout", s))
        .transpose()?;

    Ok(Timing {
        poll_interval,
        settle_delay: duration_field("settle_delay", &raw.settle_delay)?,
        inter_command_delay: duration_field("inter_command_delay", &raw.inter_command_delay)?,
        individual_command_delay: duration_field(
            "individual_command_delay",
            &raw.individual_command_delay,
        )?,
        drain_timeout: duration_field("drain_timeout", &raw.drain_timeout)?,
        exit_timeout,
    })
}

fn duration_field(key: &str, value: &str) -> Result<Duration> {
    parse_duration(value)
        .map_err(|e| CmdfeedError::ConfigError(format!("[timing].{}: {}", key, e)))
}
