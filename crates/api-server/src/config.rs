//! Server configuration from environment variables

use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATABASE_URL: &str = "sqlite://tasks.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Which repository implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub database_url: String,
    pub max_connections: u32,
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let bind_raw = var("TASKS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                name: "TASKS_BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let store = match var("TASKS_STORE") {
            None => StoreBackend::Sqlite,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "sqlite" => StoreBackend::Sqlite,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "TASKS_STORE",
                        value: raw,
                        reason: "expected 'sqlite' or 'memory'".to_string(),
                    })
                }
            },
        };

        let database_url =
            var("TASKS_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = match var("TASKS_DB_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        name: "TASKS_DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        name: "TASKS_DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
        };

        Ok(Self {
            bind_addr,
            store,
            database_url,
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert_eq!(config.database_url, "sqlite://tasks.db?mode=rwc");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("TASKS_BIND_ADDR", "127.0.0.1:9000"),
            ("TASKS_STORE", " Memory "),
            ("TASKS_DATABASE_URL", "sqlite::memory:"),
            ("TASKS_DB_MAX_CONNECTIONS", "2"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 2);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("TASKS_STORE", "  "), ("TASKS_BIND_ADDR", "")]).unwrap();
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = config_from(&[("TASKS_STORE", "postgres")]).unwrap_err();
        assert!(err.to_string().contains("TASKS_STORE"));

        assert!(config_from(&[("TASKS_BIND_ADDR", "not-an-addr")]).is_err());
        assert!(config_from(&[("TASKS_DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(config_from(&[("TASKS_DB_MAX_CONNECTIONS", "many")]).is_err());
    }
}
