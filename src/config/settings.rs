//! Process settings read from the environment (`.env` is loaded by the binary).

use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// When set, records live in PostgreSQL; otherwise in process memory.
    pub database_url: Option<String>,
    /// Schema holding the resource tables.
    pub database_schema: String,
    /// JSON resource config; the built-in resources are used when unset.
    pub resources_path: Option<PathBuf>,
    pub body_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            database_url: None,
            database_schema: "public".into(),
            resources_path: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(v) => v.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: format!("'{}': {}", v, e),
            })?,
            None => defaults.port,
        };
        let body_limit = match get("BODY_LIMIT_BYTES") {
            Some(v) => v.parse::<usize>().map_err(|e| ConfigError::Invalid {
                key: "BODY_LIMIT_BYTES",
                reason: format!("'{}': {}", v, e),
            })?,
            None => defaults.body_limit,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            database_url: get("DATABASE_URL"),
            database_schema: get("DATABASE_SCHEMA").unwrap_or(defaults.database_schema),
            resources_path: get("RESOURCES_PATH").map(PathBuf::from),
            body_limit,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
