//! Configuration module.
//!
//! Handles the `dbmeta.toml` settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, ConnectionSettings, ReflectionSettings, Settings, SettingsError,
};
