//! Client configuration: backend location and initial toggle values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{DEFAULT_BASE_URL, DEFAULT_GREETING};
use crate::models::{LlmProvider, ModerationLevel, Toggles};
use crate::paths::get_config_path;

/// Environment variable overriding the configured backend
pub const BASE_URL_ENV: &str = "RAG_CHAT_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the config directory")]
    NoConfigDir,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default)]
    pub dlp_enabled: bool,
    #[serde(default)]
    pub moderation_enabled: bool,
    #[serde(default)]
    pub moderation_level: ModerationLevel,
    #[serde(default)]
    pub provider: Option<LlmProvider>,
    #[serde(default)]
    pub model: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            greeting: default_greeting(),
            dlp_enabled: false,
            moderation_enabled: false,
            moderation_level: ModerationLevel::default(),
            provider: None,
            model: None,
        }
    }
}

impl ChatConfig {
    /// Toggle values a new session starts with
    pub fn initial_toggles(&self) -> Toggles {
        Toggles {
            dlp_enabled: self.dlp_enabled,
            moderation_enabled: self.moderation_enabled,
            moderation_level: self.moderation_level,
            provider: self.provider,
            model: self.model.clone(),
        }
    }

    /// Stores the given toggles as the new defaults
    pub fn remember_toggles(&mut self, toggles: &Toggles) {
        self.dlp_enabled = toggles.dlp_enabled;
        self.moderation_enabled = toggles.moderation_enabled;
        self.moderation_level = toggles.moderation_level;
        self.provider = toggles.provider;
        self.model = toggles.model.clone();
    }

    /// Applies overrides: CLI value first, then the environment
    pub fn with_overrides(
        mut self,
        cli_base_url: Option<String>,
        env_base_url: Option<String>,
    ) -> Self {
        let non_blank = |u: &String| !u.trim().is_empty();
        if let Some(url) = cli_base_url.filter(non_blank).or(env_base_url.filter(non_blank)) {
            self.base_url = url;
        }
        self
    }
}

/// Resolves the config file, preferring an explicit path
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path().ok_or(ConfigError::NoConfigDir),
    }
}

/// Loads the config at `path`, falling back to defaults when it does not exist
pub fn load_config(path: &Path) -> Result<ChatConfig, ConfigError> {
    if !path.exists() {
        return Ok(ChatConfig::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_config(path: &Path, config: &ChatConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
