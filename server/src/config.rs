use std::env;
use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "cookbook.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path (`:memory:` is not useful with a pool)
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_pool_size: u32,
    /// Adds X-DB-Query-Count to every response
    pub track_db_query_count: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
                name: "BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let db_pool_size = match lookup("DB_POOL_SIZE") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        name: "DB_POOL_SIZE",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        name: "DB_POOL_SIZE",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_POOL_SIZE,
        };

        let track_db_query_count = lookup("TRACK_DB_QUERY_COUNT")
            .map(|v| v == "1")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            bind_addr,
            db_pool_size,
            track_db_query_count,
        })
    }
}
