//! Server configuration, read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::catalog::HttpCatalogConfig;

/// Listen address when `BUS_BIND_ADDR` is unset.
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

/// Default HTTP catalog timeout (seconds).
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// Neither a snapshot path nor an API URL was given
    #[error("no bus data source: set BUS_DATA_PATH or BUS_API_URL")]
    NoCatalog,
}

/// Where the server gets its bus data.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// JSON snapshot loaded into memory at startup.
    Snapshot(PathBuf),
    /// Remote bus API.
    Http(HttpCatalogConfig),
}

/// Configuration for the bus route server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// JSON snapshot for the in-memory catalog.
    pub data_path: Option<PathBuf>,

    /// Base URL of a remote bus API.
    pub api_url: Option<String>,

    /// Optional API key for the remote bus API.
    pub api_key: Option<String>,

    /// Request timeout for the remote bus API (seconds).
    pub api_timeout_secs: u64,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("BUS_BIND_ADDR") {
            config.bind_addr = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue {
                    var: "BUS_BIND_ADDR",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = get("BUS_API_TIMEOUT") {
            config.api_timeout_secs = match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        var: "BUS_API_TIMEOUT",
                        value,
                        reason: "must be positive".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        var: "BUS_API_TIMEOUT",
                        value,
                        reason: e.to_string(),
                    });
                }
            };
        }

        config.data_path = get("BUS_DATA_PATH").map(PathBuf::from);
        config.api_url = get("BUS_API_URL");
        config.api_key = get("BUS_API_KEY");

        Ok(config)
    }

    /// Pick the catalog to serve from. A snapshot path wins over an API URL.
    pub fn catalog_source(&self) -> Result<CatalogSource, ConfigError> {
        if let Some(path) = &self.data_path {
            return Ok(CatalogSource::Snapshot(path.clone()));
        }

        let Some(url) = &self.api_url else {
            return Err(ConfigError::NoCatalog);
        };

        let mut http = HttpCatalogConfig::new(url.as_str()).with_timeout(self.api_timeout_secs);
        if let Some(key) = &self.api_key {
            http = http.with_api_key(key.as_str());
        }

        Ok(CatalogSource::Http(http))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            data_path: None,
            api_url: None,
            api_key: None,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}
