//! locale-sync
//!
//! 翻訳ファイルの差分同期。前回のターゲットと比べて、新しいキーや値が null の
//! キーだけを翻訳サービスに送り、既存の訳文はそのまま残す。

pub mod annotation;
pub mod cache;
pub mod config;
pub mod engine;
pub mod file_formats;
pub mod matchers;
pub mod services;
pub mod sync;
pub mod tset;

#[cfg(test)]
mod test_utils;

pub use sync::{
    SyncError,
    SyncReport,
    run_sync,
};
pub use tset::TSet;
