//! Configuration loading, validation, and management for Pipewright.
//!
//! Loads configuration from `~/.pipewright/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use pipewright_core::knowledge::DEFAULT_MIN_SIMILARITY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Providers `build_from_config` knows how to construct.
pub const SUPPORTED_PROVIDERS: [&str; 2] = ["openai", "gemini"];

/// The root configuration structure.
///
/// Maps directly to `~/.pipewright/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the selected provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model backend: "openai" or "gemini"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Completion model (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Embedding model (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,

    /// Base URL override, e.g. for an OpenAI-compatible proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_provider() -> String {
    "openai".into()
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("api_url", &self.api_url)
            .field("knowledge", &self.knowledge)
            .field("tools", &self.tools)
            .finish()
    }
}

/// Knowledge retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Lowest cosine similarity a retrieved fragment may have
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    /// Never hand out the same fragment twice in one session
    #[serde(default)]
    pub avoid_repeats: bool,

    /// Text files loaded into the knowledge store at startup
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

fn default_min_similarity() -> f64 {
    0.5
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            min_similarity: default_min_similarity(),
            avoid_repeats: false,
            files: Vec::new(),
        }
    }
}

/// Shell tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory the shell tools operate in
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Skip the confirmation prompt for tools that modify files
    #[serde(default)]
    pub auto_approve: bool,
}

fn default_true() -> bool {
    true
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            working_dir: default_working_dir(),
            auto_approve: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.pipewright/config.toml).
    ///
    /// Environment overrides:
    /// - `PIPEWRIGHT_PROVIDER`, `PIPEWRIGHT_MODEL`
    /// - `PIPEWRIGHT_API_KEY` (always wins over the file)
    /// - `OPENAI_API_KEY` / `GEMINI_API_KEY` matching the provider, only when
    ///   neither the file nor `PIPEWRIGHT_API_KEY` sets a key
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = var("PIPEWRIGHT_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = var("PIPEWRIGHT_MODEL") {
            self.model = Some(model);
        }

        if let Some(key) = var("PIPEWRIGHT_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            let provider_key = match self.provider.as_str() {
                "gemini" => "GEMINI_API_KEY",
                _ => "OPENAI_API_KEY",
            };
            self.api_key = var(provider_key);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".pipewright")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SUPPORTED_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown provider '{}' (expected one of: {})",
                self.provider,
                SUPPORTED_PROVIDERS.join(", ")
            )));
        }

        let min = self.knowledge.min_similarity;
        if !(DEFAULT_MIN_SIMILARITY..=1.0).contains(&min) {
            return Err(ConfigError::ValidationError(
                "knowledge.min_similarity must be between -1.0 and 1.0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: None,
            embedding_model: None,
            api_url: None,
            knowledge: KnowledgeConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "openai");
        assert!(config.tools.enabled);
        assert!(!config.tools.auto_approve);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider, config.provider);
        assert_eq!(parsed.knowledge.min_similarity, config.knowledge.min_similarity);
        assert_eq!(parsed.tools.working_dir, config.tools.working_dir);
    }

    #[test]
    fn unknown_provider_rejected() {
        let config = AppConfig {
            provider: "anthropic".into(),
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("anthropic"));
    }

    #[test]
    fn out_of_range_similarity_rejected() {
        for min_similarity in [-1.5, 1.01] {
            let config = AppConfig {
                knowledge: KnowledgeConfig {
                    min_similarity,
                    ..KnowledgeConfig::default()
                },
                ..AppConfig::default()
            };
            assert!(config.validate().is_err(), "{min_similarity} accepted");
        }
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider, "openai");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "provider = \"gemini\"\n\n[knowledge]\navoid_repeats = true\nfiles = [\"notes.txt\"]\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.provider, "gemini");
        assert!(config.knowledge.avoid_repeats);
        assert_eq!(config.knowledge.files, vec![PathBuf::from("notes.txt")]);
        assert_eq!(config.knowledge.min_similarity, 0.5);
        assert!(config.tools.enabled);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "provider = [").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn invalid_file_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[knowledge]\nmin_similarity = 3.0\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn env_overrides_provider_and_model() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("PIPEWRIGHT_PROVIDER", "gemini"),
            ("PIPEWRIGHT_MODEL", "gemini-2.5-pro"),
            ("GEMINI_API_KEY", "g-key"),
            ("OPENAI_API_KEY", "o-key"),
        ]));
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(config.api_key.as_deref(), Some("g-key"));
    }

    #[test]
    fn generic_key_beats_provider_key() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(env(&[
            ("PIPEWRIGHT_API_KEY", "p-key"),
            ("OPENAI_API_KEY", "o-key"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("p-key"));
    }

    #[test]
    fn file_key_is_not_overridden() {
        let mut config = AppConfig {
            api_key: Some("file-key".into()),
            ..AppConfig::default()
        };
        config.apply_env_overrides(env(&[("OPENAI_API_KEY", "o-key")]));
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn pipewright_key_overrides_file_key() {
        let mut config = AppConfig {
            api_key: Some("file-key".into()),
            ..AppConfig::default()
        };
        config.apply_env_overrides(env(&[
            ("PIPEWRIGHT_API_KEY", "p-key"),
            ("OPENAI_API_KEY", "o-key"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("p-key"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("provider = \"openai\""));
        assert!(toml_str.contains("[knowledge]"));
        assert!(toml_str.contains("[tools]"));
    }
}
