//! Environment-driven configuration for the notes client.

use crate::manager::ManagerConfig;
use std::env;
use std::time::Duration;

/// Environment variable names
pub mod env_vars {
    pub const API_URL: &str = "NOTES_API_URL";
    pub const SYNC_DEBOUNCE_MS: &str = "NOTES_SYNC_DEBOUNCE_MS";
    /// Page/demo context stamped on new notes and used as fallback category
    pub const MODEL_CONTEXT: &str = "NOTES_MODEL_CONTEXT";
}

/// Default values
pub mod defaults {
    pub const API_URL: &str = "http://127.0.0.1:9110";
    pub const SYNC_DEBOUNCE_MS: u64 = 500;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub sync_debounce: Duration,
    pub model_context: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::API_URL.to_string(),
            sync_debounce: Duration::from_millis(defaults::SYNC_DEBOUNCE_MS),
            model_context: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(env_vars::API_URL).filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(env_vars::SYNC_DEBOUNCE_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.sync_debounce = Duration::from_millis(ms),
                Err(_) => log::warn!(
                    "[CONFIG] Invalid {} value '{}', using {}ms",
                    env_vars::SYNC_DEBOUNCE_MS,
                    raw,
                    defaults::SYNC_DEBOUNCE_MS
                ),
            }
        }

        config.model_context = lookup(env_vars::MODEL_CONTEXT)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        config
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            model_context: self.model_context.clone(),
            sync_debounce: self.sync_debounce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config.api_url, "http://127.0.0.1:9110");
        assert_eq!(config.sync_debounce, Duration::from_millis(500));
        assert!(config.model_context.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(|key| match key {
            env_vars::API_URL => Some("http://notes.internal:8080".to_string()),
            env_vars::SYNC_DEBOUNCE_MS => Some("250".to_string()),
            env_vars::MODEL_CONTEXT => Some(" Merchant-Financed (MIT) ".to_string()),
            _ => None,
        });

        assert_eq!(config.api_url, "http://notes.internal:8080");
        let manager = config.manager_config();
        assert_eq!(manager.sync_debounce, Duration::from_millis(250));
        assert_eq!(manager.model_context.as_deref(), Some("Merchant-Financed (MIT)"));
    }

    #[test]
    fn test_invalid_debounce_keeps_default() {
        let config = ClientConfig::from_lookup(|key| {
            (key == env_vars::SYNC_DEBOUNCE_MS).then(|| "soon".to_string())
        });
        assert_eq!(config.sync_debounce, Duration::from_millis(500));
    }
}
