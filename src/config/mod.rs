use std::env;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(#[from] env::VarError),

    #[error("Invalid APP_TIMEZONE '{0}'")]
    InvalidTimezone(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    /// Calendar used to decide what "today" is for stats and revenue defaults.
    pub timezone: Tz,
    /// Trailing window used when the stats endpoint gets no start date.
    pub stats_default_window_days: u64,
}

/// Parse an IANA zone name; unset means UTC.
///
/// "Today" for stats windows and the revenue year follows this zone, so a
/// site that is not on UTC must set `APP_TIMEZONE` (e.g. `Asia/Dubai`) or
/// dates near midnight land on the wrong calendar day.
pub fn parse_timezone(name: Option<&str>) -> Result<Tz, ConfigError> {
    match name {
        None => Ok(Tz::UTC),
        Some(name) => name
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(name.to_string())),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let timezone = parse_timezone(env::var("APP_TIMEZONE").ok().as_deref())?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            timezone,
            stats_default_window_days: env::var("STATS_DEFAULT_WINDOW_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }

    /// Current calendar date in the deployment's time zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}
