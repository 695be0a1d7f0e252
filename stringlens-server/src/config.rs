// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Stringlens Server Configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    /// HTTP API listen address (e.g., "127.0.0.1:47200")
    #[serde(default = "default_http_addr")]
    pub listen_addr: String,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Allowed CORS origins (empty = allow all)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Longest natural-language query accepted, in bytes
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the record snapshot and journal
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Journal records to disk; when false the store is purely in-memory
    #[serde(default = "default_persist")]
    pub persist: bool,
}

// Default values
fn default_http_addr() -> String {
    "127.0.0.1:47200".to_string()
}

fn default_enable_cors() -> bool {
    true
}

fn default_max_query_length() -> usize {
    2000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./stringlens-data")
}

fn default_persist() -> bool {
    true
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_http_addr(),
            enable_cors: default_enable_cors(),
            cors_origins: vec![],
            max_query_length: default_max_query_length(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            persist: default_persist(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - STRINGLENS_HTTP_ADDR: HTTP listen address (default: 127.0.0.1:47200)
    /// - STRINGLENS_DATA_DIR: Data directory path (default: ./stringlens-data)
    /// - STRINGLENS_PERSIST: Persist records to disk (default: true)
    /// - STRINGLENS_ENABLE_CORS: Enable CORS (default: true)
    /// - STRINGLENS_CORS_ORIGINS: Comma-separated allowed origins
    /// - STRINGLENS_MAX_QUERY_LENGTH: Longest natural-language query (default: 2000)
    pub fn from_env() -> Self {
        Self::default().merge_with_env()
    }

    /// Load configuration with priority: env > file > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        Ok(config.merge_with_env())
    }

    /// Override fields whose environment variable is set
    fn merge_with_env(mut self) -> Self {
        if let Ok(addr) = std::env::var("STRINGLENS_HTTP_ADDR") {
            self.server.listen_addr = addr;
        }

        if let Ok(cors) = std::env::var("STRINGLENS_ENABLE_CORS") {
            self.server.enable_cors = cors.parse().unwrap_or(true);
        }

        if let Ok(origins) = std::env::var("STRINGLENS_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(max_len) = std::env::var("STRINGLENS_MAX_QUERY_LENGTH") {
            if let Ok(val) = max_len.parse() {
                self.server.max_query_length = val;
            }
        }

        if let Ok(data_dir) = std::env::var("STRINGLENS_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(persist) = std::env::var("STRINGLENS_PERSIST") {
            self.storage.persist = persist.parse().unwrap_or(true);
        }

        self
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.listen_addr.parse()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.server.max_query_length == 0 {
            anyhow::bail!("max_query_length must be greater than 0");
        }

        if self.storage.persist && !self.storage.data_dir.exists() {
            std::fs::create_dir_all(&self.storage.data_dir)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.server.listen_addr, "127.0.0.1:47200");
        assert_eq!(config.server.max_query_length, 2000);
        assert!(config.storage.persist);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [server]
            listen_addr = "0.0.0.0:9000"

            [storage]
            persist = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_addr, "0.0.0.0:9000");
        assert!(config.server.enable_cors);
        assert!(!config.storage.persist);
        assert_eq!(config.storage.data_dir, PathBuf::from("./stringlens-data"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stringlens.toml");
        std::fs::write(&path, "[server]\nmax_query_length = 64\n").unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.server.max_query_length, 64);
        assert_eq!(config.server.listen_addr, "127.0.0.1:47200");
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("STRINGLENS_HTTP_ADDR", "0.0.0.0:8080");
        std::env::set_var("STRINGLENS_CORS_ORIGINS", "http://a.test, http://b.test");

        let config = ServerConfig::from_env();
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(
            config.server.cors_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );

        std::env::remove_var("STRINGLENS_HTTP_ADDR");
        std::env::remove_var("STRINGLENS_CORS_ORIGINS");
    }

    #[test]
    fn test_validation() {
        let mut config = ServerConfig::default();
        config.storage.persist = false;
        assert!(config.validate().is_ok());

        config.server.listen_addr = "not an address".to_string();
        assert!(config.validate().is_err());

        config.server.listen_addr = "127.0.0.1:0".to_string();
        config.server.max_query_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_creates_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = ServerConfig::default();
        config.storage.data_dir = dir.path().join("nested").join("data");

        config.validate().unwrap();
        assert!(config.storage.data_dir.is_dir());
    }
}
