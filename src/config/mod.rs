//! Configuration Module
//!
//! Loads and validates configuration from TOML files and the environment.

pub mod loader;

pub use loader::{expand_path, load_config, Config, ConfigError, DEFAULT_CONFIG_PATH};
