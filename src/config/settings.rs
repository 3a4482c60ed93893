//! TOML-based configuration.
//!
//! Supports a config file (dbmeta.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [connections.local]
//! connection_string = "postgres://${PGUSER}@localhost/shop"
//! database = "shop"
//! schema = "public"
//!
//! [connections.warehouse]
//! connection_string = "host=dw.internal user=reader password=$DW_PASSWORD dbname=dw"
//! database = "dw"
//!
//! [reflection]
//! default_schema = "public"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::metadata::PostgresCatalog;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named database connections.
    pub connections: BTreeMap<String, ConnectionSettings>,

    /// Reflection defaults.
    pub reflection: ReflectionSettings,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// PostgreSQL connection string (supports ${ENV_VAR} expansion).
    pub connection_string: String,

    /// Catalog (database) to reflect.
    #[serde(default)]
    pub database: Option<String>,

    /// Schema to reflect; falls back to `reflection.default_schema`.
    #[serde(default)]
    pub schema: Option<String>,
}

impl ConnectionSettings {
    /// Get the connection string with environment variables expanded.
    pub fn resolved_connection_string(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.connection_string)
    }

    /// Build a catalog source for this connection.
    pub fn catalog(&self) -> Result<PostgresCatalog, SettingsError> {
        Ok(PostgresCatalog::new(self.resolved_connection_string()?))
    }
}

/// Reflection defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReflectionSettings {
    /// Schema used when neither the command line nor the connection names one.
    pub default_schema: String,
}

impl Default for ReflectionSettings {
    fn default() -> Self {
        Self {
            default_schema: "public".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `DBMETA_CONFIG`
    /// 2. `./dbmeta.toml`
    /// 3. `~/.config/dbmeta/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("DBMETA_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("dbmeta.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("dbmeta").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Get a connection by name.
    pub fn get_connection(&self, name: &str) -> Result<&ConnectionSettings, SettingsError> {
        self.connections
            .get(name)
            .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string()))
    }

    /// Get the default connection ("default" if it exists, otherwise the
    /// first by name).
    pub fn default_connection(&self) -> Option<(&str, &ConnectionSettings)> {
        if let Some(conn) = self.connections.get("default") {
            return Some(("default", conn));
        }
        self.connections.iter().next().map(|(k, v)| (k.as_str(), v))
    }

    /// Schema to reflect for a connection.
    pub fn schema_for<'a>(&'a self, connection: &'a ConnectionSettings) -> &'a str {
        connection
            .schema
            .as_deref()
            .unwrap_or(&self.reflection.default_schema)
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept as is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            let name: String = chars.by_ref().take_while(|&ch| ch != '}').collect();
            if name.is_empty() {
                return Err(SettingsError::InvalidConfig(format!(
                    "empty variable reference in {:?}",
                    s
                )));
            }
            name
        } else {
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
