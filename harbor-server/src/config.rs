//! Environment configuration for the Harbor server.

use std::fmt;

use harbor_core::Port;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Which record store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    /// PostgreSQL reached through `DATABASE_URL`.
    Postgres {
        /// Connection string.
        database_url: String,
    },
    /// In-process store seeded with a fixed set of ports.
    Memory {
        /// Ports available to ships.
        ports: Vec<Port>,
    },
}

/// Server settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Record store selection.
    pub store: StoreMode,
    /// Origins allowed by CORS.
    pub ui_origins: Vec<String>,
}

/// Invalid or missing configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Build config from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HARBOR_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("HARBOR_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ConfigError::new(format!("HARBOR_PORT must be a u16 number, got {raw:?}"))
            })?,
            None => DEFAULT_PORT,
        };
        let mode = lookup("HARBOR_STORE").unwrap_or_else(|| "postgres".to_string());
        let store = if mode.eq_ignore_ascii_case("memory") {
            StoreMode::Memory {
                ports: parse_seed_ports(&lookup("HARBOR_SEED_PORTS").unwrap_or_default())?,
            }
        } else if mode.eq_ignore_ascii_case("postgres") {
            let database_url = lookup("DATABASE_URL").ok_or_else(|| {
                ConfigError::new("DATABASE_URL must be set to a PostgreSQL connection string")
            })?;
            StoreMode::Postgres { database_url }
        } else {
            return Err(ConfigError::new(format!(
                "HARBOR_STORE must be `postgres` or `memory`, got {mode:?}"
            )));
        };
        let ui_origins = lookup("HARBOR_UI_ORIGINS")
            .unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host,
            port,
            store,
            ui_origins,
        })
    }
}

/// Parse `id:capacity` pairs separated by commas.
fn parse_seed_ports(raw: &str) -> Result<Vec<Port>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = || {
                ConfigError::new(format!(
                    "HARBOR_SEED_PORTS entry {entry:?} must look like id:capacity"
                ))
            };
            let (id, capacity) = entry.split_once(':').ok_or_else(invalid)?;
            let id = id.trim().parse::<i64>().map_err(|_| invalid())?;
            let capacity = capacity.trim().parse::<i32>().map_err(|_| invalid())?;
            if capacity < 0 {
                return Err(invalid());
            }
            Ok(Port { id, capacity })
        })
        .collect()
}
