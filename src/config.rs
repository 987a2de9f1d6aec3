//! Configuration Management
//!
//! Resolves provider settings from explicit values, environment variables
//! and the persisted config file, in that order.

use crate::kontent::{ApiKey, KontentClient, DEFAULT_BASE_URL};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the management API key
pub const API_KEY_ENV: &str = "KONTENT_API_KEY";
/// Environment variable holding the project identifier
pub const PROJECT_ID_ENV: &str = "KONTENT_PROJECT_ID";
/// Environment variable overriding the management API endpoint
pub const BASE_URL_ENV: &str = "KONTENT_MANAGEMENT_URL";

/// Persisted user configuration.
///
/// Security: the API key is never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Last used project ID
    #[serde(default)]
    pub project_id: Option<String>,
    /// Management API endpoint override
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kontent-provider").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
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

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: &str) -> Result<()> {
        self.project_id = Some(project_id.to_string());
        self.save()
    }
}

/// Provider settings; each field is optional until resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConfig {
    pub api_key: Option<ApiKey>,
    pub project_id: Option<String>,
    pub base_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProviderConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: non_empty(lookup(API_KEY_ENV)).map(ApiKey::new),
            project_id: non_empty(lookup(PROJECT_ID_ENV)),
            base_url: non_empty(lookup(BASE_URL_ENV)),
        }
    }

    /// Non-sensitive settings from the persisted config file
    pub fn from_file(config: &Config) -> Self {
        Self {
            api_key: None,
            project_id: non_empty(config.project_id.clone()),
            base_url: non_empty(config.base_url.clone()),
        }
    }

    /// Fill unset fields from `fallback`
    pub fn or(self, fallback: ProviderConfig) -> Self {
        Self {
            api_key: self.api_key.or(fallback.api_key),
            project_id: self.project_id.or(fallback.project_id),
            base_url: self.base_url.or(fallback.base_url),
        }
    }

    /// Get effective settings (explicit > environment > config file)
    pub fn resolve(explicit: ProviderConfig, file: &Config) -> Self {
        explicit
            .or(Self::from_env())
            .or(Self::from_file(file))
    }

    /// Build a client, failing if required settings are missing
    pub fn client(&self) -> Result<KontentClient> {
        let Some(api_key) = self.api_key.clone().filter(|k| !k.is_empty()) else {
            bail!(
                "No API key configured. Set {} or pass --api-key",
                API_KEY_ENV
            );
        };
        let Some(project_id) = self.project_id.as_deref() else {
            bail!(
                "No project configured. Set {} or pass --project",
                PROJECT_ID_ENV
            );
        };
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

        tracing::info!("Using project: {}, endpoint: {}", project_id, base_url);

        KontentClient::with_base_url(api_key, project_id, base_url)
            .context("Failed to initialize management API client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_documented_variables() {
        let cfg = ProviderConfig::from_lookup(lookup(&[
            ("KONTENT_API_KEY", "env-key"),
            ("KONTENT_PROJECT_ID", "env-project"),
        ]));
        assert_eq!(cfg.api_key, Some(ApiKey::new("env-key")));
        assert_eq!(cfg.project_id.as_deref(), Some("env-project"));
        assert!(cfg.base_url.is_none());
    }

    #[test]
    fn test_empty_variables_are_unset() {
        let cfg = ProviderConfig::from_lookup(lookup(&[("KONTENT_API_KEY", "  ")]));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn test_precedence_explicit_env_file() {
        let explicit = ProviderConfig {
            project_id: Some("cli-project".to_string()),
            ..Default::default()
        };
        let env = ProviderConfig::from_lookup(lookup(&[
            ("KONTENT_API_KEY", "env-key"),
            ("KONTENT_PROJECT_ID", "env-project"),
        ]));
        let file = ProviderConfig::from_file(&Config {
            project_id: Some("file-project".to_string()),
            base_url: Some("http://localhost:1234".to_string()),
        });

        let cfg = explicit.or(env).or(file);
        assert_eq!(cfg.project_id.as_deref(), Some("cli-project"));
        assert_eq!(cfg.api_key, Some(ApiKey::new("env-key")));
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:1234"));
    }

    #[test]
    fn test_client_requires_key_and_project() {
        let err = ProviderConfig {
            project_id: Some("p".to_string()),
            ..Default::default()
        }
        .client()
        .unwrap_err();
        assert!(err.to_string().contains("KONTENT_API_KEY"));

        let err = ProviderConfig {
            api_key: Some(ApiKey::new("k")),
            ..Default::default()
        }
        .client()
        .unwrap_err();
        assert!(err.to_string().contains("KONTENT_PROJECT_ID"));

        let client = ProviderConfig {
            api_key: Some(ApiKey::new("k")),
            project_id: Some("p".to_string()),
            base_url: None,
        }
        .client()
        .unwrap();
        assert_eq!(client.base_url(), "https://manage.kontent.ai/");
    }

    #[test]
    fn test_debug_never_shows_api_key() {
        let cfg = ProviderConfig {
            api_key: Some(ApiKey::new("super-secret")),
            ..Default::default()
        };
        assert!(!format!("{:?}", cfg).contains("super-secret"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            project_id: Some("proj-1".to_string()),
            base_url: None,
        };
        config.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("api_key"));
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_missing_or_corrupt_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Config::load_from(&path), Config::default());

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
