// src/config/mod.rs

//! Configuration loading and validation for cmdfeed.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Resolve and validate it into a [`ConfigFile`] (`validate.rs`).
//! - Parse the duration strings used in `[timing]` (`duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ConfigFile, FileSettings, RawConfigFile, RawFilesSection, RawTimingSection, RawToolSection,
    Timing, ToolSettings,
};
