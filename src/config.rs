use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub event_buffer_size: usize,
    pub sim: SimConfig,
}

/// Timing and randomness knobs for the fleet/booking simulation. Tests shrink
/// the delays; production values mirror the demo's fixed timers.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub fleet_seed: Option<u64>,
    pub fleet_jitter_interval: Duration,
    pub confirm_after: Duration,
    pub arriving_after: Duration,
    pub arrived_after: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fleet_seed: None,
            fleet_jitter_interval: Duration::from_millis(30_000),
            confirm_after: Duration::from_millis(3_000),
            arriving_after: Duration::from_millis(2_000),
            arrived_after: Duration::from_millis(5_000),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let sim = SimConfig {
            fleet_seed: parse_optional("FLEET_SEED")?,
            fleet_jitter_interval: Duration::from_millis(parse_or_default(
                "FLEET_JITTER_INTERVAL_MS",
                30_000,
            )?),
            confirm_after: Duration::from_millis(parse_or_default("BOOKING_CONFIRM_MS", 3_000)?),
            arriving_after: Duration::from_millis(parse_or_default("BOOKING_ARRIVING_MS", 2_000)?),
            arrived_after: Duration::from_millis(parse_or_default("BOOKING_ARRIVED_MS", 5_000)?),
        };

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "TaxiNow".to_string()),
            database_url: env::var("DATABASE_URL").ok(),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            sim,
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

fn parse_optional<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(None),
    }
}
