//! Configuration loading and management
//!
//! Configuration only selects which store instance and listener are bound;
//! it carries no business logic. Values come from an optional YAML file
//! (`PAYMENTS_CONFIG`) and are then overridden by environment variables.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value '{value}' for {var}: {message}")]
    InvalidValue {
        var: String,
        value: String,
        message: String,
    },
}

/// Which repository implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    DynamoDb,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "dynamodb" => Ok(StorageBackend::DynamoDb),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// AWS connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    pub region: String,

    /// Endpoint used in test mode (local DynamoDB)
    pub dynamodb_endpoint: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: "ap-southeast-2".to_string(),
            dynamodb_endpoint: "http://localhost:8000".to_string(),
        }
    }
}

/// Table names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    pub payments: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            payments: "Payments".to_string(),
        }
    }
}

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Test mode binds the local store instead of AWS
    pub is_test: bool,

    pub name: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            is_test: false,
            name: "development".to_string(),
        }
    }
}

/// HTTP listener and logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// Default filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub aws: AwsConfig,
    pub tables: TablesConfig,
    pub environment: EnvironmentConfig,
    pub server: ServerConfig,
    pub storage: StorageBackend,
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    ///
    /// `PAYMENTS_CONFIG` names an optional YAML file used as the base; every
    /// other variable overrides a single field.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup("PAYMENTS_CONFIG") {
            Some(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(region) = lookup("AWS_REGION") {
            self.aws.region = region;
        }
        if let Some(endpoint) = lookup("MOCK_DYNAMODB_ENDPOINT") {
            self.aws.dynamodb_endpoint = endpoint;
        }
        if let Some(table) = lookup("PAYMENTS_TABLE") {
            self.tables.payments = table;
        }

        let env_name = lookup("APP_ENV").or_else(|| lookup("NODE_ENV"));
        if let Some(name) = &env_name {
            self.environment.name = name.clone();
        }
        if env_name.as_deref() == Some("test") {
            self.environment.is_test = true;
        }
        if let Some(flag) = lookup("PAYMENTS_TEST_MODE") {
            self.environment.is_test = is_truthy(&flag);
        }

        if let Some(addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.server.log_level = level;
        }
        if let Some(storage) = lookup("PAYMENTS_STORAGE") {
            self.storage = storage.parse().map_err(|message| ConfigError::InvalidValue {
                var: "PAYMENTS_STORAGE".to_string(),
                value: storage.clone(),
                message,
            })?;
        }

        Ok(())
    }
}
