use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Environment variable that overrides the stored API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Persisted application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub schema_version: u32,
    /// Model used for image-to-prompt and regenerate calls
    pub prompt_model: String,
    /// Model used for prompt-to-image calls
    pub image_model: String,
    /// Per-request timeout for generation calls
    pub request_timeout_secs: u64,
    /// Stored API key; the environment variable takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: 1,
            prompt_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            request_timeout_secs: 30,
            api_key: None,
        }
    }
}

impl Config {
    /// Get the default config directory
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".promptstudio"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the default history log path
    pub fn history_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("history.json"))
    }

    /// Load config from file or return default
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                debug!("Failed to load config, using default: {}", e);
                Self::default()
            }
        }
    }

    /// Load config from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Resolve the API credential: environment first, then the stored key.
    /// Blank values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(GEMINI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
    }

    /// Per-request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.prompt_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "gemini-2.5-flash-image");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_dir() {
        let path = Config::config_dir().unwrap();
        assert!(path.to_string_lossy().contains(".promptstudio"));
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path().unwrap();
        assert!(path.to_string_lossy().ends_with("config.json"));
    }

    #[test]
    fn test_history_path() {
        let path = Config::history_path().unwrap();
        assert!(path.to_string_lossy().ends_with("history.json"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config {
            schema_version: 1,
            prompt_model: "gemini-2.5-pro".to_string(),
            image_model: "imagen-x".to_string(),
            request_timeout_secs: 45,
            api_key: Some("stored-key".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.prompt_model, "gemini-2.5-pro");
        assert_eq!(parsed.request_timeout_secs, 45);
        assert_eq!(parsed.api_key, Some("stored-key".to_string()));
    }

    #[test]
    fn test_api_key_absent_when_missing() {
        // Only meaningful when the environment does not provide a key
        let config = Config::default();
        if std::env::var(GEMINI_API_KEY_ENV).is_err() {
            assert!(config.resolve_api_key().is_none());
        }
    }

    #[test]
    fn test_blank_stored_key_counts_as_absent() {
        let config = Config {
            api_key: Some("   ".to_string()),
            ..Config::default()
        };
        if std::env::var(GEMINI_API_KEY_ENV).is_err() {
            assert!(config.resolve_api_key().is_none());
        }
    }

    #[test]
    fn test_stored_key_is_resolved() {
        let config = Config {
            api_key: Some("stored-key".to_string()),
            ..Config::default()
        };
        if std::env::var(GEMINI_API_KEY_ENV).is_err() {
            assert_eq!(config.resolve_api_key(), Some("stored-key".to_string()));
        }
    }

    #[test]
    fn test_request_timeout() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
