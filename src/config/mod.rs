//! Configuration module for the Kisan+ store.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file backing the key-value store
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Simulated latency of the crop analysis service
    pub analysis_delay: Duration,
    /// Keep records in memory only (demo sessions)
    pub ephemeral: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("KISAN_DB_PATH")
            .unwrap_or_else(|_| "./data/kisan.sqlite".to_string())
            .into();

        let bind_addr = env::var("KISAN_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid KISAN_BIND_ADDR: {}", e)))?;

        let log_level = env::var("KISAN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let delay_ms: u64 = env::var("KISAN_ANALYSIS_DELAY_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid KISAN_ANALYSIS_DELAY_MS: {}", e)))?;

        let ephemeral = env::var("KISAN_EPHEMERAL")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            analysis_delay: Duration::from_millis(delay_ms),
            ephemeral,
        })
    }
}
