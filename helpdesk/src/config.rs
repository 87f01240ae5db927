//! Configuration for the helpdesk binaries.
//!
//! Loaded from environment variables (after `dotenvy::dotenv()` in the
//! binaries). Only the remote store location is required; everything else
//! has a development default.

use helpdesk_core::TransitionPolicy;
use helpdesk_rest::RemoteConfig;
use std::net::SocketAddr;
use thiserror::Error;

/// Environment variable selecting the status transition policy
pub const STATUS_POLICY_VAR: &str = "HELPDESK_STATUS_POLICY";

/// Errors from loading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Remote store settings are missing
    #[error(transparent)]
    Remote(#[from] helpdesk_rest::ConfigError),

    /// A variable is set to something unusable
    #[error("Invalid value for {var}: {value}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Remote ticket store
    pub remote: RemoteConfig,
    /// Which status changes the admin surfaces accept
    pub status_policy: TransitionPolicy,
}

/// HTTP server configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log level filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Metrics server host
    pub metrics_host: String,
    /// Metrics server port
    pub metrics_port: u16,
    /// Browser origins allowed to call the API; empty allows any
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Address the API listens on
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when host and port do not form a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        socket_addr("HOST", &self.host, self.port)
    }

    /// Address the Prometheus scrape endpoint listens on
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when host and port do not form a
    /// socket address.
    pub fn metrics_addr(&self) -> Result<SocketAddr, ConfigError> {
        socket_addr("METRICS_HOST", &self.metrics_host, self.metrics_port)
    }
}

fn socket_addr(var: &'static str, host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    format!("{host}:{port}")
        .parse()
        .map_err(|_| ConfigError::Invalid {
            var,
            value: host.to_string(),
        })
}

fn port(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u16,
) -> Result<u16, ConfigError> {
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        _ => Ok(default),
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `SUPABASE_URL` or `SUPABASE_ANON_KEY`
    /// is missing, when a port is not a number, or when the status policy
    /// is unknown.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let remote = RemoteConfig::from_lookup(&lookup)?;

        let status_policy = match lookup(STATUS_POLICY_VAR) {
            Some(value) if !value.trim().is_empty() => {
                value.parse().map_err(|_| ConfigError::Invalid {
                    var: STATUS_POLICY_VAR,
                    value,
                })?
            },
            _ => TransitionPolicy::default(),
        };

        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: port(&lookup, "PORT", 8080)?,
                log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
                metrics_host: lookup("METRICS_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                metrics_port: port(&lookup, "METRICS_PORT", 9090)?,
                cors_origins: lookup("CORS_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            remote,
            status_policy,
        })
    }
}
