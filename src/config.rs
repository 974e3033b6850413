// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use globset::{Glob, GlobSet, GlobSetBuilder};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the completion service. Falls back to OPENAI_API_KEY,
    /// then to the system keychain.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for OpenAI-compatible APIs (default: https://api.openai.com/v1)
    #[serde(default)]
    pub base_url: Option<String>,

    /// LLM temperature (0.0-2.0, default 0.3)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate (default 256)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds (default 60)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Glob patterns for changed files that are never offered for selection
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Prefix messages with a type emoji (default: true)
    #[serde(default = "default_true")]
    pub emoji: bool,
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    256
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_exclude() -> Vec<String> {
    vec![
        "Cargo.lock".into(),
        "package-lock.json".into(),
        "yarn.lock".into(),
        "pnpm-lock.yaml".into(),
    ]
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            exclude: default_exclude(),
            emoji: true,
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.commitmoji.toml in the current directory)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".commitmoji.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        if let Some(path) = Self::config_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        // COMMITMOJI_MODEL, COMMITMOJI_API_KEY, ...
        figment = figment.merge(Env::prefixed("COMMITMOJI_").split("__"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty());
        }

        #[cfg(feature = "secure-storage")]
        if config.api_key.is_none() {
            if let Ok(entry) = keyring::Entry::new("commitmoji", KEYRING_USER) {
                if let Ok(key) = entry.get_password() {
                    config.api_key = Some(key);
                }
            }
        }

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "commitmoji").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref m) = cli.model {
            self.model = m.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::Config("model cannot be empty".into()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        if !(16..=4096).contains(&self.max_tokens) {
            return Err(Error::Config(format!(
                "max_tokens must be 16–4096, got {}",
                self.max_tokens
            )));
        }

        if !(1..=600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–600, got {}",
                self.timeout_secs
            )));
        }

        if let Some(ref url) = self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::Config(format!(
                    "base_url must start with http:// or https://, got '{url}'"
                )));
            }
        }

        self.exclude_set()?;
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// The configured key as a secret, if any
    pub fn credential(&self) -> Option<SecretString> {
        self.api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .map(|k| SecretString::from(k.clone()))
    }

    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = Glob::new(pattern)
                .map_err(|e| Error::Config(format!("invalid exclude pattern '{pattern}': {e}")))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| Error::Config(format!("invalid exclude patterns: {e}")))
    }

    /// Whether `path` matches one of the `exclude` globs, by full path or file name
    pub fn is_excluded(set: &GlobSet, path: &Path) -> bool {
        set.is_match(path) || path.file_name().is_some_and(|name| set.is_match(name))
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# commitmoji configuration

# Model used for chat completions
model = "gpt-4o-mini"

# API key (falls back to OPENAI_API_KEY, then to the system keychain)
# api_key = "sk-..."

# Base URL for OpenAI-compatible servers
# base_url = "https://api.openai.com/v1"

# Sampling temperature (0.0-2.0)
temperature = 0.3

# Maximum tokens in the generated message
max_tokens = 256

# Request timeout in seconds
timeout_secs = 60

# Changed files matching these globs are never offered for selection
exclude = ["Cargo.lock", "package-lock.json", "yarn.lock", "pnpm-lock.yaml"]

# Prefix messages with a type emoji
emoji = true
"#;

        fs::write(&path, content)?;

        // Set secure permissions (0600)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}

#[cfg(feature = "secure-storage")]
pub const KEYRING_USER: &str = "openai";
