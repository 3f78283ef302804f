//! 翻訳ファイルの読み書き
//!
//! 形式ごとに `TFileFormat` を実装し、`FileFormat` から選ぶ。

mod arb;
mod flat_json;
mod nested_json;
mod po;
mod types;

use std::path::Path;

pub use arb::ArbFormat;
pub use flat_json::FlatJsonFormat;
pub use nested_json::{
    NestedJsonFormat,
    flatten_json,
};
pub use po::PoFormat;
pub use types::{
    FileError,
    FileFormat,
    ParsedFile,
    ReadArgs,
    WriteArgs,
};

use crate::tset::TSet;

/// 翻訳ファイル形式
pub trait TFileFormat: Send + Sync {
    /// ファイルを読み込む
    ///
    /// # Errors
    /// ファイルが読めない、または形式が不正な場合
    fn read(&self, args: ReadArgs<'_>) -> Result<ParsedFile, FileError>;

    /// ファイルを書き出す（既存ファイルは上書き）
    ///
    /// # Errors
    /// 書き込みに失敗した場合
    fn write(&self, args: WriteArgs<'_>) -> Result<(), FileError>;
}

/// 形式に対応する実装を返す
#[must_use]
pub fn instantiate_file_format(format: FileFormat) -> Box<dyn TFileFormat> {
    match format {
        FileFormat::FlatJson => Box::new(FlatJsonFormat),
        FileFormat::NestedJson => Box::new(NestedJsonFormat),
        FileFormat::Arb => Box::new(ArbFormat),
        FileFormat::Po => Box::new(PoFormat),
    }
}

/// ソースファイルを読み込む
///
/// # Errors
/// ファイルが存在しない、読めない、または形式が不正な場合
pub fn read_source_file(path: &Path, lng: &str, format: FileFormat) -> Result<ParsedFile, FileError> {
    tracing::debug!("Reading {:?} file: {}", format, path.display());
    instantiate_file_format(format).read(ReadArgs { path, lng })
}

/// 前回のターゲットファイルを読み込む
///
/// # Returns
/// - `Ok(Some(tset))`: 読み込み成功
/// - `Ok(None)`: ファイルがまだ存在しない
/// - `Err(FileError)`: ファイルはあるが読めない、または壊れている
pub fn read_target_file(path: &Path, lng: &str, format: FileFormat) -> Result<Option<TSet>, FileError> {
    match read_source_file(path, lng, format) {
        Ok(parsed) => Ok(Some(parsed.tset)),
        Err(FileError::NotFound(_)) => {
            tracing::debug!("Target file does not exist yet: {}", path.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// マッピングをファイルへ書き出す
///
/// # Errors
/// 書き込みに失敗した場合
pub fn write_tset_file(
    path: &Path,
    lng: &str,
    format: FileFormat,
    tset: &TSet,
) -> Result<(), FileError> {
    tracing::debug!("Writing {} keys to {}", tset.len(), path.display());
    instantiate_file_format(format).write(WriteArgs { path, lng, tset })
}

/// ファイルをテキストとして読み込む
pub(crate) fn read_text(path: &Path) -> Result<String, FileError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            FileError::NotFound(path.to_path_buf())
        } else {
            FileError::Io { path: path.to_path_buf(), source }
        }
    })
}

/// テキストをファイルへ書き出す（親ディレクトリも作成）
pub(crate) fn write_text(path: &Path, content: &str) -> Result<(), FileError> {
    let io_error = |source| FileError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, content).map_err(io_error)
}
