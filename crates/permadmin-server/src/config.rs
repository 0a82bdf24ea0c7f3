//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Configuration for the admin server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (default: all interfaces).
    pub host: IpAddr,
    /// TCP port (default: 3000).
    pub port: u16,
    /// Optional JSON seed file holding the catalog and initial users.
    /// Takes precedence over `demo_data`.
    pub seed_file: Option<PathBuf>,
    /// Seed the ten demo users when no seed file is given (default: true).
    /// When false, the store starts with the built-in catalog only.
    pub demo_data: bool,
    /// Emit JSON log lines instead of human-readable ones (default: false).
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            seed_file: None,
            demo_data: true,
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Read configuration from `PERMADMIN_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("PERMADMIN_HOST") {
            config.host = parse(&raw, "PERMADMIN_HOST", "IP address")?;
        }
        if let Some(raw) = lookup("PERMADMIN_PORT") {
            config.port = parse(&raw, "PERMADMIN_PORT", "port number")?;
        }
        if let Some(raw) = lookup("PERMADMIN_SEED_FILE") {
            if !raw.trim().is_empty() {
                config.seed_file = Some(PathBuf::from(raw.trim()));
            }
        }
        if let Some(raw) = lookup("PERMADMIN_DEMO_DATA") {
            config.demo_data = parse_bool(&raw, "PERMADMIN_DEMO_DATA")?;
        }
        if let Some(raw) = lookup("PERMADMIN_LOG_JSON") {
            config.log_json = parse_bool(&raw, "PERMADMIN_LOG_JSON")?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(
    raw: &str,
    var: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value: raw.to_owned(),
    })
}

fn parse_bool(raw: &str, var: &'static str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "boolean",
            value: raw.to_owned(),
        }),
    }
}
