//! File format type definitions.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use clap::ValueEnum;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::tset::TSet;

/// Errors raised while reading or writing translation files
#[derive(Error, Debug)]
pub enum FileError {
    /// The file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Any other I/O failure
    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file exists but its content is not valid for the format
    #[error("Failed to parse '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },
    /// The mapping cannot be represented in the format
    #[error("Failed to serialize '{}': {message}", path.display())]
    Serialize { path: PathBuf, message: String },
}

impl FileError {
    /// `Parse` エラーを作成する
    pub(crate) fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse { path: path.to_path_buf(), message: message.into() }
    }

    /// `Serialize` エラーを作成する
    pub(crate) fn serialize(path: &Path, message: impl Into<String>) -> Self {
        Self::Serialize { path: path.to_path_buf(), message: message.into() }
    }
}

/// Supported file formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FileFormat {
    /// `{"key": "text"}`
    #[default]
    FlatJson,
    /// `{"a": {"b": "text"}}`, keys flattened with `.`
    NestedJson,
    /// Flutter Application Resource Bundle
    Arb,
    /// gettext PO
    Po,
}

/// Arguments for reading a file
#[derive(Debug, Clone, Copy)]
pub struct ReadArgs<'a> {
    pub path: &'a Path,
    /// Declared language of the file
    pub lng: &'a str,
}

/// Arguments for writing a file
#[derive(Debug, Clone, Copy)]
pub struct WriteArgs<'a> {
    pub path: &'a Path,
    pub lng: &'a str,
    pub tset: &'a TSet,
}

/// Result of reading a file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFile {
    pub tset: TSet,
    /// Raw comment attached to each key, if the format has comments
    pub comments: HashMap<String, String>,
}

impl ParsedFile {
    #[must_use]
    pub fn without_comments(tset: TSet) -> Self {
        Self { tset, comments: HashMap::new() }
    }
}
