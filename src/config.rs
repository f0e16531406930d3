use std::{num::ParseIntError, path::PathBuf, str::FromStr, time::Duration};

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key} {value:?}: {source}")]
    InvalidNumber {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub static_dir: PathBuf,
    pub templates_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn init() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        let secs = |key: &'static str, default: &str| {
            parse_number::<u64>(key, get(key, default)).map(Duration::from_secs)
        };

        Ok(Self {
            server: ServerConfig {
                address: get("SERVER_ADDRESS", ":8080"),
                read_timeout: secs("SERVER_READ_TIMEOUT", "10")?,
                write_timeout: secs("SERVER_WRITE_TIMEOUT", "10")?,
            },
            db: DbConfig {
                host: get("DB_HOST", "localhost"),
                port: parse_number("DB_PORT", get("DB_PORT", "5432"))?,
                user: get("DB_USER", "postgres"),
                password: get("DB_PASSWORD", "postgres"),
                name: get("DB_NAME", "myapp"),
                ssl_mode: get("DB_SSLMODE", "disable"),
            },
            static_dir: get("STATIC_DIR", "/app/web/static").into(),
            templates_dir: get("TEMPLATES_DIR", "/app/web/templates").into(),
        })
    }
}

fn parse_number<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParseIntError>,
{
    value
        .parse()
        .map_err(|source| ConfigError::InvalidNumber { key, value, source })
}

impl ServerConfig {
    /// Socket address to bind. A bare `:port` listens on every interface.
    pub fn bind_address(&self) -> String {
        match self.address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => self.address.clone(),
        }
    }

    /// Deadline for reading a request and writing its response. Zero timeouts
    /// disable it.
    pub fn request_deadline(&self) -> Option<Duration> {
        Some(self.read_timeout + self.write_timeout).filter(|deadline| !deadline.is_zero())
    }
}

impl DbConfig {
    /// libpq style key/value connection string with the password masked.
    pub fn redacted_dsn(&self) -> String {
        format!(
            "host={} port={} user={} password=**** dbname={} sslmode={}",
            self.host, self.port, self.user, self.name, self.ssl_mode
        )
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(PgSslMode::from_str(&self.ssl_mode)?)
            .application_name("CRMandLead"))
    }
}
