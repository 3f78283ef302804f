//! Translation service type definitions.

use clap::ValueEnum;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Errors returned by translation backends
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Required credential is not configured
    #[error("Missing credential for service '{0}'. Set 'serviceConfig' or the OPENAI_API_KEY environment variable")]
    MissingCredential(String),
    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(String),
    /// The backend answered with something we cannot interpret
    #[error("Invalid response from translation service: {0}")]
    InvalidResponse(String),
    /// The backend reported an error
    #[error("Translation service error: {0}")]
    Api(String),
}

/// Available translation backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    /// OpenAI-compatible chat completions API
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAi,
    /// Copies the source text unchanged
    #[default]
    SyncWithoutTranslate,
    /// Uses the key itself as the translation
    KeyAsTranslation,
}

impl ServiceKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::SyncWithoutTranslate => "sync-without-translate",
            Self::KeyAsTranslation => "key-as-translation",
        }
    }
}

/// Settings needed to instantiate a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub kind: ServiceKind,
    /// API key for remote backends
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Max strings per remote request
    pub batch_size: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            kind: ServiceKind::default(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            batch_size: 50,
        }
    }
}

/// One string to translate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TString {
    pub key: String,
    /// Source text, placeholders already protected
    pub value: String,
    /// Free-text hint from annotations
    pub context: Option<String>,
}

/// One translated string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TResult {
    pub key: String,
    pub translated: String,
}

/// A single batch request to a backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TServiceArgs {
    pub strings: Vec<TString>,
    pub src_lng: String,
    pub target_lng: String,
    /// Additional instructions for AI backends
    pub prompt: String,
}
