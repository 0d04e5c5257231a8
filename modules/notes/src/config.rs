//! Environment-driven configuration for the notes service.

use std::env;
use std::path::PathBuf;

/// Environment variable names
pub mod env_vars {
    pub const PORT: &str = "NOTES_SERVICE_PORT";
    pub const HOST: &str = "NOTES_SERVICE_HOST";
    /// JSON file holding the persisted note collection
    pub const DATA_FILE: &str = "NOTES_DATA_FILE";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 9110;
    pub const HOST: &str = "127.0.0.1";
    pub const DATA_FILE: &str = "data/notes.json";
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(env_vars::PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "[CONFIG] Invalid {} value '{}', using {}",
                    env_vars::PORT,
                    raw,
                    defaults::PORT
                );
                defaults::PORT
            }),
            None => defaults::PORT,
        };

        let host = lookup(env_vars::HOST)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| defaults::HOST.to_string());

        let data_file = lookup(env_vars::DATA_FILE)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(defaults::DATA_FILE));

        Self {
            host,
            port,
            data_file,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
