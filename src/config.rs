use std::{
    env,
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use axum::http::HeaderValue;
use chrono::{Duration, NaiveTime};
use thiserror::Error;

use crate::scheduling::BusinessHours;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            _ => Err("expected `postgres` or `memory`".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub cors_origins: CorsOrigins,
    pub session_idle_timeout: Duration,
    pub seed_on_startup: bool,
    pub seed_staff_password: String,
    pub business_hours: BusinessHours,
}

pub const DEFAULT_STAFF_PASSWORD: &str = "changeme";

impl Default for Config {
    fn default() -> Self {
        Config {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8001,
            store: StoreKind::Memory,
            database_url: None,
            cors_origins: CorsOrigins::Any,
            session_idle_timeout: Duration::minutes(10080),
            seed_on_startup: false,
            seed_staff_password: DEFAULT_STAFF_PASSWORD.into(),
            business_hours: BusinessHours::default(),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let store = parse_or(&lookup, "STORE", StoreKind::Postgres)?;
        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let idle_minutes: i64 = parse_or(&lookup, "SESSION_IDLE_MINUTES", 10080)?;
        if idle_minutes <= 0 {
            return Err(invalid("SESSION_IDLE_MINUTES", idle_minutes.to_string(), "must be positive"));
        }

        let opening = parse_time(&lookup, "OPENING_TIME", defaults.business_hours.opening)?;
        let closing = parse_time(&lookup, "CLOSING_TIME", defaults.business_hours.closing)?;
        if opening >= closing {
            return Err(invalid(
                "CLOSING_TIME",
                closing.format("%H:%M").to_string(),
                "must be after OPENING_TIME",
            ));
        }
        let slot_minutes: u32 = parse_or(&lookup, "SLOT_MINUTES", defaults.business_hours.slot_minutes)?;
        if slot_minutes == 0 {
            return Err(invalid("SLOT_MINUTES", "0".into(), "must be positive"));
        }

        Ok(Config {
            host: parse_or(&lookup, "HOST", defaults.host)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            store,
            database_url,
            cors_origins: parse_cors(lookup("CORS_ORIGINS"))?,
            session_idle_timeout: Duration::minutes(idle_minutes),
            seed_on_startup: parse_or(&lookup, "SEED_ON_STARTUP", false)?,
            seed_staff_password: lookup("SEED_STAFF_PASSWORD")
                .unwrap_or(defaults.seed_staff_password),
            business_hours: BusinessHours {
                opening,
                closing,
                slot_minutes,
                ..defaults.business_hours
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

fn invalid(name: &'static str, value: String, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value,
        reason: reason.into(),
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(name, value.clone(), &e.to_string())),
        None => Ok(default),
    }
}

fn parse_time<F>(lookup: &F, name: &'static str, default: NaiveTime) -> Result<NaiveTime, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .map_err(|e| invalid(name, value.clone(), &e.to_string())),
        None => Ok(default),
    }
}

fn parse_cors(value: Option<String>) -> Result<CorsOrigins, ConfigError> {
    let value = match value {
        Some(value) => value,
        None => return Ok(CorsOrigins::Any),
    };
    let origins: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if origins.is_empty() || origins.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }
    origins
        .into_iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| invalid("CORS_ORIGINS", origin.to_owned(), &e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}
