use std::env;
use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub log_dir: String,
}

impl Config {
    /// Loads `.env.local` / `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::from_filename(".env.local").ok();
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".into()))?;

        let port = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| AppError::Config("PORT must be a number".into()))?,
            None => 3000,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().map_err(|_| AppError::Config("DB_MAX_CONNECTIONS must be a number".into()))?,
            None => 5,
        };

        Ok(Self {
            database_url,
            port,
            max_connections,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "./logs".to_string()),
        })
    }

    pub fn is_postgres(&self) -> bool {
        self.database_url.starts_with("postgres://") || self.database_url.starts_with("postgresql://")
    }
}
