//! Configuration Management
//!
//! Handles persistent configuration storage for ptracker.

use crate::tracker::{auth, DEFAULT_BASE_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default project ID
    #[serde(default)]
    pub project_id: Option<u64>,
    /// API root override
    #[serde(default)]
    pub base_url: Option<String>,
    /// API token
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        auth::get_config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective project (environment > config)
    pub fn effective_project(&self) -> Option<u64> {
        auth::get_default_project().or(self.project_id)
    }

    /// Get effective token (environment > config)
    pub fn effective_token(&self) -> Option<String> {
        auth::get_default_token().or_else(|| {
            self.api_token
                .clone()
                .filter(|token| auth::validate_token(token))
        })
    }

    /// Get effective API root (environment > config > public API)
    pub fn effective_base_url(&self) -> String {
        auth::get_default_base_url()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: u64) -> Result<()> {
        self.project_id = Some(project_id);
        self.save()
    }

    /// Set token and save
    pub fn set_token(&mut self, token: &str) -> Result<()> {
        if !auth::validate_token(token) {
            anyhow::bail!("Invalid API token format");
        }
        self.api_token = Some(token.to_string());
        self.save()
    }

    /// Set API root and save
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        url::Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        self.base_url = Some(base_url.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ptracker-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = Config::load_from(&scratch_file("missing.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = scratch_file("nested/config.json");
        let config = Config {
            project_id: Some(99),
            base_url: Some("http://localhost:8080/services/v5".to_string()),
            api_token: Some("abc123".to_string()),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_file_loads_defaults() {
        let path = scratch_file("invalid.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());

        let _ = std::fs::remove_file(&path);
    }
}
