//! Configuration types and loading
//!
//! Defaults match a local checkout: documents under `./data`, covers under
//! `./uploads`, listening on port 5000. Environment variables override them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upload ceiling for a single cover image (5 MiB)
pub const MAX_UPLOAD_SIZE: u64 = 5 * 1024 * 1024;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Storage configuration
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding `books.json`
    pub data_dir: PathBuf,
    /// Root served under `/uploads`; covers live in its `books/` subdirectory
    pub uploads_dir: PathBuf,
    /// Maximum cover size in bytes
    pub max_upload_size: u64,
    /// Write the starter collection when no document exists yet
    pub seed_on_first_run: bool,
    /// Orphaned covers younger than this are left alone by the sweep
    pub orphan_grace_seconds: u64,
}

impl StorageConfig {
    pub fn books_file(&self) -> PathBuf {
        self.data_dir.join("books.json")
    }

    pub fn orphan_grace(&self) -> Duration {
        Duration::from_secs(self.orphan_grace_seconds)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_body_size_bytes: 50 * 1024 * 1024, // 50MB
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
                uploads_dir: PathBuf::from("uploads"),
                max_upload_size: MAX_UPLOAD_SIZE,
                seed_on_first_run: true,
                orphan_grace_seconds: 600,
            },
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Server
        if let Some(host) = lookup("HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{}' is not a valid port", port),
            })?;
        }

        // Storage
        if let Some(dir) = lookup("BOOKSHELF_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("BOOKSHELF_UPLOADS_DIR") {
            config.storage.uploads_dir = PathBuf::from(dir);
        }
        if let Some(seed) = lookup("BOOKSHELF_SEED") {
            config.storage.seed_on_first_run = parse_bool("BOOKSHELF_SEED", &seed)?;
        }

        Ok(config)
    }

    /// Get the server address
    pub fn server_addr(&self) -> std::net::SocketAddr {
        use std::net::SocketAddr;
        let ip: std::net::IpAddr = self.server.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(ip, self.server.port)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{}' is not a boolean", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.max_upload_size, 5 * 1024 * 1024);
        assert_eq!(config.storage.books_file(), PathBuf::from("data/books.json"));
    }

    #[test]
    fn test_port_override() {
        let config = AppConfig::from_lookup(lookup_from(&[("PORT", "8081")])).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server_addr().port(), 8081);
    }

    #[test]
    fn test_invalid_port() {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_storage_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BOOKSHELF_DATA_DIR", "/srv/shelf/data"),
            ("BOOKSHELF_UPLOADS_DIR", "/srv/shelf/uploads"),
            ("BOOKSHELF_SEED", "no"),
        ]))
        .unwrap();

        assert_eq!(
            config.storage.books_file(),
            PathBuf::from("/srv/shelf/data/books.json")
        );
        assert_eq!(config.storage.uploads_dir, PathBuf::from("/srv/shelf/uploads"));
        assert!(!config.storage.seed_on_first_run);
    }
}
