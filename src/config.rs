//! Server settings read from the environment.

use std::path::PathBuf;

pub const DEFAULT_PORT: &str = "3001";
pub const DEFAULT_CATALOG_PATH: &str = "catalog.json";
pub const DEFAULT_LOG_FILE: &str = "development.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: String,
    pub catalog_path: PathBuf,
    pub log_file: PathBuf,
    pub sentry_dsn: Option<String>,
}

impl ServerConfig {
    /// `PORT`, `CATALOG_PATH`, `LOG_FILE` and `SENTRY_DSN`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            port: non_empty("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string()),
            catalog_path: non_empty("CATALOG_PATH")
                .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string())
                .into(),
            log_file: non_empty("LOG_FILE")
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                .into(),
            sentry_dsn: non_empty("SENTRY_DSN"),
        }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
