use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by custom tokenizers.
pub type TokenizerError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum WordBayesError {
    #[error("Tokenizer failed: {0}")]
    Tokenizer(#[source] TokenizerError),

    #[error("Classifier has no trained documents")]
    UntrainedClassifier,

    #[error("Model file is invalid: {path}: {message}")]
    ModelParse { path: PathBuf, message: String },

    #[error("Config parse error: {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config key not found: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid config value for {key}: '{value}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("Invalid training line {line}: {message}")]
    InvalidTrainingLine { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, WordBayesError>;

impl WordBayesError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UntrainedClassifier => 2,
            Self::ModelParse { .. } => 3,
            Self::ConfigParse { .. } | Self::ConfigKeyNotFound { .. } => 4,
            Self::InvalidConfigValue { .. } => 5,
            Self::InvalidTrainingLine { .. } => 6,
            Self::Tokenizer(_) => 7,
            _ => 1,
        }
    }
}
