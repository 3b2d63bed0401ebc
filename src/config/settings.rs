//! Application settings loaded from environment variables.

use std::env;

use super::constants::{DEFAULT_ADMIN_EMAIL, DEFAULT_APP_NAME, DEFAULT_DATABASE_URL, DEFAULT_SWEEP_INTERVAL_SECS};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Application name used in notification subjects and signatures
    pub app_name: String,
    /// Address that receives new-submission alerts
    pub admin_email: String,
    /// Sweep cadence in seconds
    pub sweep_interval_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("app_name", &self.app_name)
            .field("admin_email", &self.admin_email)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string()),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}
