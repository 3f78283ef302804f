use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::engine::SourceOverrides;
use crate::file_formats::FileFormat;
use crate::matchers::MatcherKind;
use crate::services::{
    ServiceKind,
    ServiceSettings,
};

/// 設定値 1 つに対する検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "sourceOverrides.de")
    pub field_path: String,
    /// エラー内容
    pub message: String,
}

impl ValidationError {
    /// 検証エラーを作成する
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// 設定の読み込み・検証エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 検証エラー（すべての違反を含む）
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// 設定ファイルの読み込みに失敗
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// 設定ファイルの JSON が不正
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 検証エラーを番号付きの複数行テキストにする
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings read from `.locale-sync.json` and overlaid with CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    pub src_file: PathBuf,
    pub src_lng: String,
    pub src_format: FileFormat,

    pub target_file: PathBuf,
    pub target_lng: String,
    pub target_format: FileFormat,

    pub service: ServiceKind,
    /// Credential for remote services.
    pub service_config: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Max strings per remote request.
    pub batch_size: usize,

    pub matcher: MatcherKind,
    /// Extra instructions passed to the translation service.
    pub prompt: String,

    /// Target language -> language whose file is used as the source instead.
    pub source_overrides: SourceOverrides,

    /// Directory for the source cache. Outdated detection is off when unset.
    pub cache_dir: Option<PathBuf>,
    /// Re-translate keys whose source text changed since the last run.
    pub overwrite_outdated: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        let service = ServiceSettings::default();
        Self {
            src_file: PathBuf::new(),
            src_lng: String::new(),
            src_format: FileFormat::default(),
            target_file: PathBuf::new(),
            target_lng: String::new(),
            target_format: FileFormat::default(),
            service: ServiceKind::default(),
            service_config: None,
            model: service.model,
            base_url: service.base_url,
            batch_size: service.batch_size,
            matcher: MatcherKind::default(),
            prompt: String::new(),
            source_overrides: SourceOverrides::new(),
            cache_dir: None,
            overwrite_outdated: false,
        }
    }
}

impl SyncSettings {
    /// # Errors
    /// - Required field is empty
    /// - Source and target language are the same
    /// - Invalid source override
    /// - Batch size is zero
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.src_file.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "srcFile",
                "The source file is required. Example: \"locales/en.json\"",
            ));
        }
        if self.target_file.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "targetFile",
                "The target file is required. Example: \"locales/de.json\"",
            ));
        }
        if self.src_lng.trim().is_empty() {
            errors.push(ValidationError::new("srcLng", "The source language is required. Example: \"en\""));
        }
        if self.target_lng.trim().is_empty() {
            errors.push(ValidationError::new(
                "targetLng",
                "The target language is required. Example: \"de\"",
            ));
        }

        if !self.src_lng.is_empty() && self.src_lng == self.target_lng {
            errors.push(ValidationError::new(
                "srcLng/targetLng",
                format!("The source and target language must differ (both are '{}')", self.src_lng),
            ));
        }

        let mut overrides: Vec<_> = self.source_overrides.iter().collect();
        overrides.sort();
        for (target, source) in overrides {
            let field_path = format!("sourceOverrides.{target}");
            if target.trim().is_empty() || source.trim().is_empty() {
                errors.push(ValidationError::new(field_path, "Language codes cannot be empty"));
            } else if target == source {
                errors.push(ValidationError::new(
                    field_path,
                    format!("A language cannot override itself ('{target}')"),
                ));
            }
        }

        if self.batch_size == 0 {
            errors.push(ValidationError::new("batchSize", "The batch size must be at least 1"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// 検証済みの設定から実行用の設定を作る
    #[must_use]
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            src_file: self.src_file.clone(),
            src_lng: self.src_lng.clone(),
            src_format: self.src_format,
            target_file: self.target_file.clone(),
            target_lng: self.target_lng.clone(),
            target_format: self.target_format,
            service: ServiceSettings {
                kind: self.service,
                api_key: self.service_config.clone().filter(|key| !key.trim().is_empty()),
                model: self.model.clone(),
                base_url: self.base_url.clone(),
                batch_size: self.batch_size,
            },
            matcher: self.matcher,
            prompt: self.prompt.clone(),
            source_overrides: self.source_overrides.clone(),
            cache_dir: self.cache_dir.clone(),
            overwrite_outdated: self.overwrite_outdated,
        }
    }
}

/// Frozen configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub src_file: PathBuf,
    pub src_lng: String,
    pub src_format: FileFormat,
    pub target_file: PathBuf,
    pub target_lng: String,
    pub target_format: FileFormat,
    pub service: ServiceSettings,
    pub matcher: MatcherKind,
    pub prompt: String,
    pub source_overrides: SourceOverrides,
    pub cache_dir: Option<PathBuf>,
    pub overwrite_outdated: bool,
}
