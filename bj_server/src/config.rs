//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration.

use std::net::SocketAddr;

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Maximum number of concurrently active sessions
    pub max_sessions: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// CLI overrides take priority over the environment, which takes
    /// priority over the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but does not
    /// parse.
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        max_sessions_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match std::env::var("SERVER_BIND") {
                Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "SERVER_BIND".to_string(),
                    reason: format!("not a socket address: {raw}"),
                })?,
                Err(_) => DEFAULT_BIND
                    .parse()
                    .expect("default bind address is valid"),
            },
        };

        let max_sessions = match max_sessions_override {
            Some(n) => n,
            None => match std::env::var("MAX_SESSIONS") {
                Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                    var: "MAX_SESSIONS".to_string(),
                    reason: format!("not a count: {raw}"),
                })?,
                Err(_) => DEFAULT_MAX_SESSIONS,
            },
        };

        Ok(Self { bind, max_sessions })
    }

    /// Validate configuration after loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sessions == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_SESSIONS".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}
