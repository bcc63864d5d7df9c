use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::pricing::FareConfig;
use crate::utils::polyline::{DEFAULT_PRECISION, MAX_PRECISION};

pub const DEFAULT_DIRECTIONS_BASE_URL: &str = "https://maps.googleapis.com";

#[derive(Clone)]
pub struct Config {
    pub directions_api_key: String,
    pub directions_base_url: String,
    pub directions_timeout: Duration,
    pub polyline_precision: u32,
    pub fare: FareConfig,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let directions_api_key = env::var("DIRECTIONS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Config("DIRECTIONS_API_KEY must be set".to_string()))?;
        let polyline_precision =
            check_precision(parse_var("POLYLINE_PRECISION", DEFAULT_PRECISION)?)?;

        Ok(Self {
            directions_api_key,
            directions_base_url: env::var("DIRECTIONS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_DIRECTIONS_BASE_URL.to_string()),
            directions_timeout: Duration::from_secs(parse_var("DIRECTIONS_TIMEOUT_SECS", 15)?),
            polyline_precision,
            fare: FareConfig {
                base_price: parse_var("FARE_BASE_PRICE", FareConfig::default().base_price)?,
                price_per_km: parse_var("FARE_PRICE_PER_KM", FareConfig::default().price_per_km)?,
            },
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parse_var("SERVER_PORT", 3000)?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

// Keep the credential out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("directions_api_key", &"<redacted>")
            .field("directions_base_url", &self.directions_base_url)
            .field("directions_timeout", &self.directions_timeout)
            .field("polyline_precision", &self.polyline_precision)
            .field("fare", &self.fare)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

fn check_precision(precision: u32) -> AppResult<u32> {
    if precision > MAX_PRECISION {
        return Err(AppError::Config(format!(
            "POLYLINE_PRECISION must be at most {}, got {}",
            MAX_PRECISION, precision
        )));
    }
    Ok(precision)
}

fn parse_var<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}
