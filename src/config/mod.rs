// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;
use thiserror::Error;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, DatabaseConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    StorageBackend,
};

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `BUCKETEER_SERVER__PORT`
const ENV_PREFIX: &str = "BUCKETEER";

/// Connection variables understood for compatibility with existing deployments
const POSTGRES_ENV_OVERRIDES: [(&str, &str); 5] = [
    ("database.user", "POSTGRES_USER"),
    ("database.password", "POSTGRES_PASSWORD"),
    ("database.name", "POSTGRES_DB"),
    ("database.host", "POSTGRES_HOST"),
    ("database.port", "POSTGRES_PORT"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },
}

/// Load `.env` into the process environment unless `DEBUGGING` is set
///
/// A missing file is not an error: the variables may already be exported.
pub fn load_dotenv() -> Option<dotenvy::Error> {
    if std::env::var_os("DEBUGGING").is_some() {
        return None;
    }
    dotenvy::dotenv().err()
}

impl Config {
    /// Load configuration from specified file path (extension optional)
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.backlog", 1024)?
            .set_default("database.backend", "postgres")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.name", "bucketeer")?
            .set_default("database.max_connections", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.shutdown_grace_period", 5)?
            .set_default("http.server_name", "bucketeer")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .add_source(::config::File::with_name(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        for (key, var) in POSTGRES_ENV_OVERRIDES {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ConfigError::InvalidAddress { addr, source })
    }
}
