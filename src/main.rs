// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, OracleProvider};
use app_controller::{Controller, RunOptions};

mod app_config;
mod app_controller;
mod checkpoint;
mod document;
mod errors;
mod extractor;
mod file_utils;
mod language_utils;
mod pipeline;
mod providers;
mod render;

/// CLI wrapper for OracleProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOracleProvider {
    Ollama,
    Anthropic,
}

impl From<CliOracleProvider> for OracleProvider {
    fn from(cli_provider: CliOracleProvider) -> Self {
        match cli_provider {
            CliOracleProvider::Ollama => OracleProvider::Ollama,
            CliOracleProvider::Anthropic => OracleProvider::Anthropic,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an ebook (default command)
    #[command(alias = "run")]
    Translate(TranslateArgs),

    /// Generate shell completions for bookwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input document to translate (pdf, docx or epub)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Custom translation prompt (overrides the configured system prompt)
    #[arg(short = 'p', long)]
    prompt: Option<String>,

    /// Working directory (default: <stem>_work next to the input)
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Translation oracle provider to use
    #[arg(long, value_enum)]
    provider: Option<CliOracleProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Merge even if some pages failed, with visible placeholders
    #[arg(long)]
    best_effort: bool,

    /// Discard any existing working directory and start over
    #[arg(long)]
    fresh: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// bookwai - AI ebook translation with durable resume
///
/// Splits a PDF, DOCX or EPUB into pages, translates them with an AI
/// provider and reassembles a styled HTML ebook with a table of contents.
/// Interrupted runs resume where they left off.
#[derive(Parser, Debug)]
#[command(name = "bookwai")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered ebook translation tool")]
#[command(long_about = "bookwai splits an ebook into pages, translates each page with an AI provider
and reassembles a styled HTML ebook with a generated table of contents.
Progress is checkpointed after every page: rerunning the same command resumes
where the previous run stopped without re-translating finished pages.

EXAMPLES:
    bookwai book.pdf                         # Translate using default config
    bookwai -s en -t fr book.epub            # Translate from English to French
    bookwai --provider anthropic book.pdf    # Use a specific provider
    bookwai --best-effort book.pdf           # Merge even if some pages failed
    bookwai --fresh book.pdf                 # Ignore previous progress
    bookwai completions bash > bookwai.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    ollama    - Local Ollama server
    anthropic - Anthropic Claude API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input document to translate (pdf, docx or epub)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Custom translation prompt (overrides the configured system prompt)
    #[arg(short = 'p', long)]
    prompt: Option<String>,

    /// Working directory (default: <stem>_work next to the input)
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Translation oracle provider to use
    #[arg(long, value_enum)]
    provider: Option<CliOracleProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Merge even if some pages failed, with visible placeholders
    #[arg(long)]
    best_effort: bool,

    /// Discard any existing working directory and start over
    #[arg(long)]
    fresh: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default.
    // The level is updated after loading the config if needed.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "bookwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            let input = cli
                .input
                .ok_or_else(|| anyhow!("INPUT is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input,
                source_language: cli.source_language,
                target_language: cli.target_language,
                prompt: cli.prompt,
                work_dir: cli.work_dir,
                provider: cli.provider,
                model: cli.model,
                best_effort: cli.best_effort,
                fresh: cli.fresh,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        if let Some(provider) = &options.provider {
            config.translation.provider = provider.clone().into();
        }

        if let Some(model) = &options.model {
            let provider_str = config.translation.provider.to_lowercase_string();
            if let Some(provider_config) = config
                .translation
                .available_providers
                .iter_mut()
                .find(|p| p.provider_type == provider_str)
            {
                provider_config.model = model.clone();
            }
        }

        if let Some(source_lang) = &options.source_language {
            config.source_language = source_lang.clone();
        }

        if let Some(target_lang) = &options.target_language {
            config.target_language = target_lang.clone();
        }

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let mut config = Config::default();

        if let Some(provider) = &options.provider {
            config.translation.provider = provider.clone().into();
        }
        if let Some(source_lang) = &options.source_language {
            config.source_language = source_lang.clone();
        }
        if let Some(target_lang) = &options.target_language {
            config.target_language = target_lang.clone();
        }
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;

    let run_options = RunOptions {
        input_file: options.input,
        work_dir: options.work_dir,
        custom_prompt: options.prompt,
        best_effort: options.best_effort,
        fresh: options.fresh,
    };

    let summary = controller.run(&run_options).await?;

    if summary.has_failures() {
        // Best-effort output was already written; the exit status still
        // reports that the translation is not complete
        return Err(anyhow!(
            "{} page(s) failed to translate; rerun to retry them",
            summary.failed
        ));
    }

    Ok(())
}
