//! Entry point for the `locale-sync` command.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use locale_sync::config::{
    ConfigError,
    ConfigManager,
    SyncSettings,
};
use locale_sync::file_formats::FileFormat;
use locale_sync::matchers::MatcherKind;
use locale_sync::services::{
    ServiceKind,
    instantiate_service,
};
use locale_sync::{
    SyncError,
    run_sync,
};
use tracing_subscriber::EnvFilter;

/// Incrementally synchronize a translation file with its source.
#[derive(Debug, Parser)]
#[command(name = "locale-sync", version, about)]
struct Cli {
    /// Configuration file (default: `.locale-sync.json` in the working directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source translation file
    #[arg(long)]
    src_file: Option<PathBuf>,
    /// Language code of the source file (e.g. `en`)
    #[arg(long)]
    src_lng: Option<String>,
    /// Format of the source file
    #[arg(long, value_enum)]
    src_format: Option<FileFormat>,

    /// Target translation file to create or update
    #[arg(long)]
    target_file: Option<PathBuf>,
    /// Language code of the target file (e.g. `de`)
    #[arg(long)]
    target_lng: Option<String>,
    /// Format of the target file
    #[arg(long, value_enum)]
    target_format: Option<FileFormat>,

    /// Translation service
    #[arg(long, value_enum)]
    service: Option<ServiceKind>,
    /// API key for remote services
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    service_config: Option<String>,
    /// Model name for the `openai` service
    #[arg(long)]
    model: Option<String>,
    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,
    /// Max strings per request to a remote service
    #[arg(long)]
    batch_size: Option<usize>,

    /// Placeholder syntax protected from translation
    #[arg(long, value_enum)]
    matcher: Option<MatcherKind>,
    /// Extra instructions for the translation service
    #[arg(long)]
    prompt: Option<String>,

    /// `TARGET=SOURCE`, e.g. `de-CH=de` (repeatable)
    #[arg(long = "source-override", value_parser = parse_source_override)]
    source_overrides: Vec<(String, String)>,

    /// Directory for the source cache (enables outdated detection)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Translate again keys whose source text changed since the last run
    #[arg(long)]
    overwrite_outdated: bool,

    /// Log at debug level (overridden by `RUST_LOG`)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// 指定されたフラグで設定ファイルの値を上書きする
    fn apply_to(self, settings: &mut SyncSettings) {
        if let Some(src_file) = self.src_file {
            settings.src_file = src_file;
        }
        if let Some(src_lng) = self.src_lng {
            settings.src_lng = src_lng;
        }
        if let Some(src_format) = self.src_format {
            settings.src_format = src_format;
        }
        if let Some(target_file) = self.target_file {
            settings.target_file = target_file;
        }
        if let Some(target_lng) = self.target_lng {
            settings.target_lng = target_lng;
        }
        if let Some(target_format) = self.target_format {
            settings.target_format = target_format;
        }
        if let Some(service) = self.service {
            settings.service = service;
        }
        if let Some(model) = self.model {
            settings.model = model;
        }
        if let Some(base_url) = self.base_url {
            settings.base_url = base_url;
        }
        if let Some(batch_size) = self.batch_size {
            settings.batch_size = batch_size;
        }
        if let Some(matcher) = self.matcher {
            settings.matcher = matcher;
        }
        if let Some(prompt) = self.prompt {
            settings.prompt = prompt;
        }
        if self.service_config.is_some() {
            settings.service_config = self.service_config;
        }
        if self.cache_dir.is_some() {
            settings.cache_dir = self.cache_dir;
        }
        settings.overwrite_outdated |= self.overwrite_outdated;
        settings.source_overrides.extend(self.source_overrides);
    }
}

/// `TARGET=SOURCE` 形式の引数を分解する
fn parse_source_override(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(target, source)| (target.trim().to_string(), source.trim().to_string()))
        .ok_or_else(|| format!("expected TARGET=SOURCE, got '{value}'"))
}

/// 設定を読み込み、同期を 1 回実行する
async fn run(cli: Cli) -> Result<(), SyncError> {
    let workspace_root = std::env::current_dir().map_err(ConfigError::IoError)?;

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(&workspace_root, cli.config.as_deref())?;

    let mut settings = config_manager.get_settings().clone();
    cli.apply_to(&mut settings);
    config_manager.update_settings(settings)?;
    let run_config = config_manager.run_config()?;

    let service = instantiate_service(&run_config.service)?;
    let report = run_sync(&run_config, service.as_ref()).await?;

    if report.target_written {
        tracing::info!("Wrote {}", run_config.target_file.display());
    }
    Ok(())
}

/// Parses flags, sets up logging and runs one sync.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
