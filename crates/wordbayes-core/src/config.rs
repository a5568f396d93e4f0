use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WordBayesError};
use crate::tokenizer::DefaultTokenizer;

const CONFIG_FILE: &str = "config.toml";

/// Default model file name, relative to the base directory
pub const DEFAULT_MODEL_FILE: &str = "model.json";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# wordbayes configuration file
# Location: ~/.wordbayes/config.toml

[model]
# Where the trained model is stored (relative paths are resolved against
# the base directory)
# Default: "model.json"
path = "model.json"

[tokenizer]
# Lowercase tokens before counting them
# Default: false
lowercase = false

[classify]
# Number of categories shown by `wordbayes classify` (0 = all)
# Default: 0
top = 0
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    #[serde(default)]
    pub classify: ClassifyConfig,
}

/// Model storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Model file path
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_FILE)
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

/// Default tokenizer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TokenizerConfig {
    #[serde(default)]
    pub lowercase: bool,
}

/// Classification output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClassifyConfig {
    /// Categories to show, 0 for all
    #[serde(default)]
    pub top: usize,
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| WordBayesError::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "model.path" => Some(self.model.path.display().to_string()),
            "tokenizer.lowercase" => Some(self.tokenizer.lowercase.to_string()),
            "classify.top" => Some(self.classify.top.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || WordBayesError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "model.path" => {
                let trimmed = value.trim().trim_matches('"');
                if trimmed.is_empty() {
                    return Err(invalid());
                }
                self.model.path = PathBuf::from(trimmed);
            }
            "tokenizer.lowercase" => {
                self.tokenizer.lowercase = parse_bool(value).ok_or_else(invalid)?;
            }
            "classify.top" => {
                self.classify.top = value.trim().parse().map_err(|_| invalid())?;
            }
            _ => {
                return Err(WordBayesError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["model.path", "tokenizer.lowercase", "classify.top"]
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }

    /// Resolve the model file against the base directory
    pub fn model_path(&self, base_dir: &Path) -> PathBuf {
        if self.model.path.is_absolute() {
            self.model.path.clone()
        } else {
            base_dir.join(&self.model.path)
        }
    }

    /// Build the default tokenizer described by this config
    pub fn to_tokenizer(&self) -> DefaultTokenizer {
        DefaultTokenizer::new().lowercase(self.tokenizer.lowercase)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
