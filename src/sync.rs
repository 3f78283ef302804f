//! 1 回の同期実行
//!
//! ファイルを読み込み、差分同期エンジンを通して、ターゲットとソースキャッシュを書き出す。

use serde::Serialize;
use thiserror::Error;

use crate::annotation::parse_annotations;
use crate::cache::{
    CacheError,
    load_source_cache,
    outdated_keys,
    write_source_cache,
};
use crate::config::{
    ConfigError,
    RunConfig,
};
use crate::engine::{
    ChangeSet,
    CoreArgs,
    CoreError,
    FileOverrideSource,
    translate_core,
};
use crate::file_formats::{
    FileError,
    read_source_file,
    read_target_file,
    write_tset_file,
};
use crate::services::{
    ServiceError,
    TService,
};
use crate::tset::TSet;

/// 同期実行全体のエラー
#[derive(Error, Debug)]
pub enum SyncError {
    /// 翻訳ファイルの読み書きエラー
    #[error(transparent)]
    File(#[from] FileError),

    /// 差分計算のエラー
    #[error(transparent)]
    Core(#[from] CoreError),

    /// 設定エラー
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// キャッシュの書き込みエラー
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// 翻訳サービスのエラー
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// 同期実行の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub change_set: ChangeSet,
    pub new_target: TSet,
    /// ターゲットファイルを書き換えたか（内容が同じなら書かない）
    pub target_written: bool,
}

/// 設定に従って同期を 1 回実行する
///
/// # Errors
/// - ソースが読めない、または空
/// - 既存のターゲットが壊れている
/// - 翻訳サービスの失敗
/// - ターゲットやキャッシュの書き込み失敗
pub async fn run_sync(config: &RunConfig, service: &dyn TService) -> Result<SyncReport, SyncError> {
    let source = read_source_file(&config.src_file, &config.src_lng, config.src_format)?;
    let old_target = read_target_file(&config.target_file, &config.target_lng, config.target_format)?;
    let annotations = parse_annotations(&source.comments);
    tracing::debug!(
        keys = source.tset.len(),
        annotated = annotations.len(),
        "Read source {}",
        config.src_file.display()
    );

    let outdated = config
        .cache_dir
        .as_deref()
        .and_then(|dir| load_source_cache(dir, &config.src_file))
        .map(|cache| outdated_keys(&source.tset, &cache))
        .filter(|outdated| !outdated.is_empty());
    if let Some(outdated) = &outdated
        && !config.overwrite_outdated
    {
        tracing::warn!(
            "{} source texts changed since the last run; enable overwriteOutdated to re-translate them: {}",
            outdated.len(),
            outdated.keys().collect::<Vec<_>>().join(", ")
        );
    }

    let override_source = FileOverrideSource {
        src_file: &config.src_file,
        src_lng: &config.src_lng,
        format: config.src_format,
    };
    let results = translate_core(
        CoreArgs {
            src: &source.tset,
            old_target: old_target.as_ref(),
            annotations: &annotations,
            src_lng: &config.src_lng,
            target_lng: &config.target_lng,
            source_overrides: &config.source_overrides,
            outdated: outdated.as_ref().filter(|_| config.overwrite_outdated),
            matcher: config.matcher,
            prompt: &config.prompt,
        },
        service,
        &override_source,
    )
    .await?;

    let target_written = old_target.as_ref() != Some(&results.new_target);
    if target_written {
        write_tset_file(&config.target_file, &config.target_lng, config.target_format, &results.new_target)?;
    } else {
        tracing::debug!("Target is up to date: {}", config.target_file.display());
    }

    if let Some(cache_dir) = &config.cache_dir {
        write_source_cache(cache_dir, &config.src_file, &source.tset)?;
    }

    let change_set = results.change_set;
    tracing::info!(
        added = change_set.added.len(),
        updated = change_set.updated.len(),
        skipped = change_set.skipped.len(),
        deleted = change_set.deleted.as_ref().map_or(0, TSet::len),
        "Synced {} -> {}",
        config.src_lng,
        config.target_lng
    );

    Ok(SyncReport { change_set, new_target: results.new_target, target_written })
}
