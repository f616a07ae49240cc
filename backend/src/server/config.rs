//! Process settings and the resolved server configuration.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use super::state_builders::StoreBackend;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_STORE: &str = "memory";
const DEFAULT_MONGO_DATABASE: &str = "hostwatch";

/// Settings loaded once at startup from flags, `HOSTWATCH_*` variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOSTWATCH")]
pub struct AppSettings {
    /// Socket address to listen on.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: String,
    /// Store backend: `memory`, `postgres` or `mongo`.
    #[ortho_config(default = String::from(DEFAULT_STORE))]
    pub store: String,
    /// PostgreSQL connection string, required by the `postgres` store.
    pub database_url: Option<String>,
    /// Upper bound on pooled PostgreSQL connections.
    pub pool_max_size: Option<u32>,
    /// MongoDB connection string, required by the `mongo` store.
    pub mongo_uri: Option<String>,
    /// MongoDB database name.
    pub mongo_database: Option<String>,
}

/// Rejections raised while resolving [`AppSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}")]
    BindAddr { value: String },
    #[error("unknown store {value:?}; expected memory, postgres or mongo")]
    UnknownStore { value: String },
    #[error("store {store} requires {setting}")]
    MissingSetting {
        store: &'static str,
        setting: &'static str,
    },
    #[error("store {store} is not compiled in; rebuild with --features {store}")]
    NotCompiled { store: &'static str },
}

/// Backend selection with the settings each backend needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    Memory,
    Postgres {
        database_url: String,
        pool_max_size: Option<u32>,
    },
    Mongo {
        uri: String,
        database: String,
    },
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = self.bind_addr.trim();
        raw.parse().map_err(|_| ConfigError::BindAddr {
            value: raw.to_owned(),
        })
    }

    pub fn mongo_database(&self) -> &str {
        self.mongo_database
            .as_deref()
            .unwrap_or(DEFAULT_MONGO_DATABASE)
    }

    /// Resolve the selected store, rejecting incomplete combinations.
    pub fn store(&self) -> Result<StoreSettings, ConfigError> {
        let selected = self.store.trim();
        match selected.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreSettings::Memory),
            "postgres" => {
                let database_url = self.database_url.clone().ok_or(ConfigError::MissingSetting {
                    store: "postgres",
                    setting: "database_url",
                })?;
                Ok(StoreSettings::Postgres {
                    database_url,
                    pool_max_size: self.pool_max_size,
                })
            }
            "mongo" => {
                if cfg!(not(feature = "mongo")) {
                    return Err(ConfigError::NotCompiled { store: "mongo" });
                }
                let uri = self.mongo_uri.clone().ok_or(ConfigError::MissingSetting {
                    store: "mongo",
                    setting: "mongo_uri",
                })?;
                Ok(StoreSettings::Mongo {
                    uri,
                    database: self.mongo_database().to_owned(),
                })
            }
            _ => Err(ConfigError::UnknownStore {
                value: selected.to_owned(),
            }),
        }
    }
}

/// Everything `create_server` needs, resolved before the listener starts.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: StoreBackend,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, store: StoreBackend) -> Self {
        Self { bind_addr, store }
    }
}
