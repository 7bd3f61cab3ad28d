//! Configuration module
//!
//! Settings for the database pool, local blob storage, share links, the metadata
//! cache and the expiry reaper. Everything is read from the environment (and an
//! optional `.env` file).

use std::env;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const STORAGE_PATH: &str = "./tmp";
const SHARE_BASE_URL: &str = "http://localhost:8080/files";
const CACHE_MAX_CAPACITY: u64 = 10_000;
const REAPER_INTERVAL_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    /// Root directory of the local blob store
    pub storage_path: String,
    /// Prefix of every share URL; `/share/{token}` is appended
    pub share_base_url: String,
    pub cache_max_capacity: u64,
    pub reaper_enabled: bool,
    pub reaper_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database_url,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
            storage_path: env::var("STORAGE_PATH").unwrap_or_else(|_| STORAGE_PATH.to_string()),
            share_base_url: env::var("SHARE_BASE_URL")
                .unwrap_or_else(|_| SHARE_BASE_URL.to_string()),
            cache_max_capacity: env::var("CACHE_MAX_CAPACITY")
                .unwrap_or_else(|_| CACHE_MAX_CAPACITY.to_string())
                .parse()
                .unwrap_or(CACHE_MAX_CAPACITY),
            reaper_enabled: env::var("REAPER_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            reaper_interval_secs: env::var("REAPER_INTERVAL_SECS")
                .unwrap_or_else(|_| REAPER_INTERVAL_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REAPER_INTERVAL_SECS must be a valid number"))?,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than 0"));
        }

        if self.storage_path.trim().is_empty() {
            return Err(anyhow::anyhow!("STORAGE_PATH must not be empty"));
        }

        if !(self.share_base_url.starts_with("http://")
            || self.share_base_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "SHARE_BASE_URL must start with http:// or https://"
            ));
        }

        if self.reaper_enabled && self.reaper_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "REAPER_INTERVAL_SECS must be greater than 0 when the reaper is enabled"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_seconds)
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs)
    }
}
