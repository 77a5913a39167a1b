// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** resolve durations
/// or check values. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and resolve it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` default functions).
/// - Parses `[timing]` durations and the optional `ready_prompt` regex.
/// - Derives the tool name from the executable when not given.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Default config location: `Cmdfeed.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Cmdfeed.toml")
}
