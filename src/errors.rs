// src/errors.rs

//! Errors that reach callers of the library.
//!
//! Most anomalies during a batch (failed writes, non-zero exits, slow output
//! readers) are absorbed into the execution reports and the session log.
//! Only configuration problems, unreadable command files and a tool that
//! cannot be started surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmdfeedError {
    /// The configuration parsed but does not describe a usable setup.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The target tool could not be started, or one of its pipes was missing.
    #[error("failed to start {tool}: {reason}")]
    Spawn { tool: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CmdfeedError>;
