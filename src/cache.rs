//! ソースキャッシュ
//!
//! 前回同期したソースのマッピングを保存し、値が変わったキー（outdated）を検出する。

use std::path::{
    Path,
    PathBuf,
};

use sha2::{
    Digest,
    Sha256,
};
use thiserror::Error;

use crate::tset::TSet;
use crate::tset::ops::{
    CompareMode,
    select_left_distinct,
};

/// キャッシュファイル名の接頭辞
const CACHE_FILE_PREFIX: &str = "locale-sync-cache-";

/// キャッシュ関連のエラー
#[derive(Error, Debug)]
pub enum CacheError {
    /// キャッシュファイルの読み書きに失敗
    #[error("Failed to access cache '{}': {source}", path.display())]
    Io {
        /// キャッシュファイルのパス
        path: PathBuf,
        /// 元の I/O エラー
        #[source]
        source: std::io::Error,
    },

    /// JSON シリアライズエラー
    #[error("Failed to serialize cache: {0}")]
    Json(#[from] serde_json::Error),
}

/// ソースファイルに対応するキャッシュファイルのパス
///
/// ソースのパスごとに別のファイルになる。
#[must_use]
pub fn cache_path(cache_dir: &Path, src_file: &Path) -> PathBuf {
    let digest = Sha256::digest(src_file.to_string_lossy().as_bytes());
    let short = hex::encode(digest).chars().take(16).collect::<String>();
    cache_dir.join(format!("{CACHE_FILE_PREFIX}{short}.json"))
}

/// キャッシュを読み込む
///
/// # Returns
/// - `Some(tset)`: 前回のソース
/// - `None`: キャッシュがない、または壊れている（警告を出して無視する）
#[must_use]
pub fn load_source_cache(cache_dir: &Path, src_file: &Path) -> Option<TSet> {
    let path = cache_path(cache_dir, src_file);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No source cache yet: {}", path.display());
            return None;
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable source cache '{}': {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<TSet>(&content) {
        Ok(cache) => {
            tracing::debug!("Loaded source cache with {} keys", cache.len());
            Some(cache)
        }
        Err(e) => {
            tracing::warn!("Ignoring corrupt source cache '{}': {}", path.display(), e);
            None
        }
    }
}

/// キャッシュを書き出す
pub fn write_source_cache(cache_dir: &Path, src_file: &Path, src: &TSet) -> Result<(), CacheError> {
    let path = cache_path(cache_dir, src_file);
    let io_error = |source| CacheError::Io { path: path.clone(), source };

    std::fs::create_dir_all(cache_dir).map_err(io_error)?;
    let content = serde_json::to_string_pretty(src)?;
    std::fs::write(&path, content).map_err(io_error)?;

    tracing::debug!("Wrote source cache: {}", path.display());
    Ok(())
}

/// 前回から値が変わったソースキー
#[must_use]
pub fn outdated_keys(src: &TSet, cache: &TSet) -> TSet {
    select_left_distinct(src, cache, CompareMode::Values)
}
