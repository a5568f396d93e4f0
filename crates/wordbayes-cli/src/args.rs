use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "wordbayes")]
#[command(about = "Naive Bayes text classifier")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.wordbayes)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Model file (overrides model.path from config)
    #[arg(short, long, global = true)]
    pub model: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Learn one labeled document
    Learn {
        /// Document text
        text: String,

        /// Category label (repeat for multi-label documents)
        #[arg(short, long = "label", required = true)]
        labels: Vec<String>,
    },

    /// Learn every document in a training file
    ///
    /// Lines are `label[,label...]<TAB>text` or JSON objects
    /// `{"text": "...", "labels": ["..."]}`. Use `-` for stdin.
    Train {
        /// Training file path
        file: PathBuf,
    },

    /// Classify a document
    Classify {
        /// Document text
        text: String,

        /// Number of categories to show (0 = all, default from config)
        #[arg(short, long)]
        top: Option<usize>,

        /// Show per-token log-probabilities
        #[arg(short, long)]
        explain: bool,

        /// Print the classification as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-category statistics
    Stats,

    /// Print the vocabulary
    Vocab,

    /// Print the model snapshot as JSON
    Export,

    /// Delete the stored model
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., tokenizer.lowercase)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., tokenizer.lowercase)
        key: String,

        /// Value to set (e.g., "true")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
