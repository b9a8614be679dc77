//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Path of the JSON document holding the record collection
    pub data_file: PathBuf,
    /// Run mutating requests one at a time
    pub serialize_writes: bool,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            storage: StorageConfig {
                data_file: env::var_os("DATA_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(crate::state::JsonFileStore::default_path),
                serialize_writes: env::var("SERIALIZE_WRITES")
                    .ok()
                    .and_then(|v| parse_flag(&v))
                    .unwrap_or(false),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = ["PORT", "HOST", "DATA_FILE", "SERIALIZE_WRITES"];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.data_file, PathBuf::from("data.json"));
        assert!(!config.storage.serialize_writes);
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("PORT", "9090");
        env::set_var("HOST", "127.0.0.1");
        env::set_var("DATA_FILE", "/tmp/records.json");
        env::set_var("SERIALIZE_WRITES", "true");

        let config = Config::from_env();
        assert_eq!(config.server_addr(), "127.0.0.1:9090");
        assert_eq!(config.storage.data_file, PathBuf::from("/tmp/records.json"));
        assert!(config.storage.serialize_writes);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        env::set_var("SERIALIZE_WRITES", "maybe");

        let config = Config::from_env();
        assert_eq!(config.server.port, 8080);
        assert!(!config.storage.serialize_writes);

        clear_env();
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
