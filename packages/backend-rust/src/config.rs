use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use lexis_algo::{ConfigError, DecayConfig, DecayModel};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/lexis.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<PathBuf>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub forget_threshold: Option<f64>,
    pub max_schedule_days: Option<u32>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_parse::<u16>("PORT").unwrap_or(3000);

        let host = env_parse::<IpAddr>("HOST").unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = env_bool("ENABLE_FILE_LOGS")
            .unwrap_or(false)
            .then(|| std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()))
            .map(PathBuf::from);

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        Self {
            host,
            port,
            log_level,
            log_dir,
            database_url,
            db_max_connections: env_parse::<u32>("DB_MAX_CONNECTIONS").unwrap_or(5).max(1),
            forget_threshold: env_parse::<f64>("FORGET_THRESHOLD"),
            max_schedule_days: env_parse::<u32>("MAX_SCHEDULE_DAYS"),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Model constants with environment overrides applied
    pub fn decay_config(&self) -> DecayConfig {
        let mut config = DecayConfig::default();
        if let Some(threshold) = self.forget_threshold {
            config.forget_threshold = threshold;
        }
        if let Some(days) = self.max_schedule_days {
            config.max_days = days;
        }
        config
    }

    pub fn decay_model(&self) -> Result<DecayModel, ConfigError> {
        DecayModel::new(self.decay_config())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Config {
        Config {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            log_level: "debug".to_string(),
            log_dir: None,
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            forget_threshold: None,
            max_schedule_days: None,
        }
    }

    #[test]
    fn test_bind_addr() {
        assert_eq!(base().bind_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_decay_overrides() {
        let config = Config {
            forget_threshold: Some(0.4),
            max_schedule_days: Some(365),
            ..base()
        };
        let decay = config.decay_config();
        assert_eq!(decay.forget_threshold, 0.4);
        assert_eq!(decay.max_days, 365);
        assert!(config.decay_model().is_ok());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = Config {
            forget_threshold: Some(1.5),
            ..base()
        };
        assert!(config.decay_model().is_err());
    }
}
