use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wordbayes_core::config::Config;
use wordbayes_core::{
    parse_training_data, ModelStore, NaiveBayesClassifier, Result, Tokenizer, WordBayesError,
};

mod args;
mod output;
use args::{Cli, Commands, ConfigAction, Shell};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);
    let ctx = Context {
        base_dir,
        model_override: cli.model,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Some(Commands::Learn { text, labels }) => handle_learn(&ctx, &text, labels).await,
        Some(Commands::Train { file }) => handle_train(&ctx, &file).await,
        Some(Commands::Classify {
            text,
            top,
            explain,
            json,
        }) => handle_classify(&ctx, &text, top, explain, json).await,
        Some(Commands::Stats) => handle_stats(&ctx),
        Some(Commands::Vocab) => handle_vocab(&ctx),
        Some(Commands::Export) => handle_export(&ctx),
        Some(Commands::Reset { force }) => handle_reset(&ctx, force),
        Some(Commands::Config { action }) => handle_config(action, &ctx.base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Per-invocation settings shared by the handlers
struct Context {
    base_dir: PathBuf,
    model_override: Option<PathBuf>,
    quiet: bool,
}

impl Context {
    fn config(&self) -> Result<Config> {
        Config::load(&self.base_dir)
    }

    fn store(&self, config: &Config) -> ModelStore {
        match &self.model_override {
            Some(path) => ModelStore::new(path),
            None => ModelStore::new(config.model_path(&self.base_dir)),
        }
    }

    /// Load config and the stored model, or start an empty one
    fn open(&self) -> Result<(NaiveBayesClassifier, ModelStore)> {
        let config = self.config()?;
        self.open_with(&config)
    }

    /// Load the stored model using an already loaded config
    fn open_with(&self, config: &Config) -> Result<(NaiveBayesClassifier, ModelStore)> {
        let store = self.store(config);
        let tokenizer: Arc<dyn Tokenizer> = Arc::new(config.to_tokenizer());

        let classifier = match store.load()? {
            Some(data) => NaiveBayesClassifier::from_data(data, tokenizer),
            None => {
                debug!(path = %store.path().display(), "starting with an empty model");
                NaiveBayesClassifier::with_shared_tokenizer(tokenizer)
            }
        };

        Ok((classifier, store))
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("WORDBAYES_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".wordbayes"))
        .unwrap_or_else(|| PathBuf::from(".wordbayes"))
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "wordbayes", &mut io::stdout());
}

async fn handle_learn(ctx: &Context, text: &str, labels: Vec<String>) -> Result<()> {
    let (mut classifier, store) = ctx.open()?;

    classifier.learn(text, labels.clone()).await?;
    store.save(&classifier.to_data())?;

    if !ctx.quiet {
        println!(
            "{} {}",
            "Learned:".green(),
            labels
                .iter()
                .map(|l| l.cyan().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

async fn handle_train(ctx: &Context, file: &Path) -> Result<()> {
    let content = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(file)?
    };

    let examples = parse_training_data(&content)?;
    let (mut classifier, store) = ctx.open()?;
    let before = classifier.total_documents();

    classifier
        .learn_all(examples.into_iter().map(|e| (e.text, e.labels)))
        .await?;
    store.save(&classifier.to_data())?;

    if !ctx.quiet {
        println!(
            "{} {} documents ({} categories, {} words)",
            "Trained:".green(),
            classifier.total_documents() - before,
            classifier.categories().len(),
            classifier.vocabulary().len()
        );
    }
    Ok(())
}

async fn handle_classify(
    ctx: &Context,
    text: &str,
    top: Option<usize>,
    explain: bool,
    json: bool,
) -> Result<()> {
    let config = ctx.config()?;
    let (classifier, _) = ctx.open_with(&config)?;

    let result = classifier.classify(text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let top = top.unwrap_or(config.classify.top);
    print!("{}", output::format_classification(&result, top, explain));
    Ok(())
}

fn handle_stats(ctx: &Context) -> Result<()> {
    let (classifier, store) = ctx.open()?;

    if classifier.categories().is_empty() {
        println!("No categories yet. Model: {}", store.path().display());
        return Ok(());
    }

    print!("{}", output::format_stats(&classifier));
    Ok(())
}

fn handle_vocab(ctx: &Context) -> Result<()> {
    let (classifier, _) = ctx.open()?;

    let mut stdout = io::stdout().lock();
    for word in classifier.vocabulary().words() {
        writeln!(stdout, "{}", word)?;
    }
    Ok(())
}

fn handle_export(ctx: &Context) -> Result<()> {
    let (classifier, _) = ctx.open()?;
    println!("{}", serde_json::to_string_pretty(&classifier.to_data())?);
    Ok(())
}

fn handle_reset(ctx: &Context, force: bool) -> Result<()> {
    let config = ctx.config()?;
    let store = ctx.store(&config);

    if !store.exists() {
        println!("Nothing to reset: {}", store.path().display());
        return Ok(());
    }

    if !force {
        println!(
            "Delete model {}? All learned data will be lost.",
            store.path().display().to_string().yellow()
        );
        print!("Type 'yes' to confirm: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if input.trim() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.remove()?;
    if !ctx.quiet {
        println!("{} {}", "Removed:".green(), store.path().display());
    }
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(WordBayesError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
