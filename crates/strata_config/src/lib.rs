//! Parsing and validation of `strata.toml` project configuration files.
//!
//! The file names the design to analyze and carries the state-pass knobs
//! (black-box mode, undriven-signal warnings) as a strongly-typed
//! [`ProjectConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
