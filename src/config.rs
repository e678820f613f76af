use std::env;

use thiserror::Error;

use crate::domain::Username;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid number, got {0:?}")]
    InvalidPort(String),
    #[error("ADMIN_USERNAME is invalid: {0}")]
    InvalidAdmin(String),
}

/// Process settings, read from the environment (and `.env`, if loaded).
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub admin_username: Username,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8080,
        };
        let admin = lookup("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string());
        let admin_username =
            Username::new(admin).map_err(|e| ConfigError::InvalidAdmin(e.to_string()))?;

        Ok(Self {
            host,
            port,
            admin_username,
        })
    }
}
