use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AdvisorResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub model: String,
    pub api_url: String,
    pub api_key: String,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AdvisorResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AdvisorResult<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".agriyield")
            .join("config.yaml")
    }

    /// Loads the user config, falling back to defaults when the file is
    /// absent or unreadable. `GEMINI_API_KEY` in the environment always
    /// wins over the key stored in the file.
    pub fn load_or_default() -> Self {
        let path = Self::config_path();
        let mut config = if path.exists() {
            match Self::load_from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("config file {} is unreadable, using defaults: {e}", path.display());
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.ai.api_key = key;
            }
        }

        config
    }

    pub fn save(&self) -> AdvisorResult<()> {
        self.save_to_file(Self::config_path())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai: AiConfig {
                model: "gemini-2.5-flash".to_string(),
                api_url: "https://generativelanguage.googleapis.com".to_string(),
                api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use assert_matches::assert_matches;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn config_round_trips_through_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let config = Config {
            ai: AiConfig {
                model: "gemini-2.5-flash".to_string(),
                api_url: "https://example.invalid".to_string(),
                api_key: "secret".to_string(),
            },
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.ai.model, config.ai.model);
        assert_eq!(loaded.ai.api_url, config.ai.api_url);
        assert_eq!(loaded.ai.api_key, config.ai.api_key);
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deep").join("nested").join("config.yaml");
        Config::default().save_to_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn invalid_yaml_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "ai: [this is not a config").unwrap();
        assert_matches!(Config::load_from_file(&path).unwrap_err(), AdvisorError::Config(_));
    }

    #[test]
    fn missing_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load_from_file(dir.path().join("absent.yaml")).unwrap_err();
        assert_matches!(err, AdvisorError::Storage(_));
    }

    #[test]
    #[serial]
    fn environment_key_overrides_the_stored_one() {
        std::env::set_var("GEMINI_API_KEY", "from-env");
        let config = Config::load_or_default();
        assert_eq!(config.ai.api_key, "from-env");
        std::env::remove_var("GEMINI_API_KEY");
    }

    #[test]
    #[serial]
    fn defaults_point_at_the_hosted_backend() {
        std::env::remove_var("GEMINI_API_KEY");
        let config = Config::default();
        assert_eq!(config.ai.model, "gemini-2.5-flash");
        assert!(config.ai.api_url.starts_with("https://generativelanguage"));
        assert!(config.ai.api_key.is_empty());
    }
}
