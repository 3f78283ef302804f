//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::collections::HashMap;

use crate::annotation::{
    AnnotationLookup,
    parse_annotations,
};
use crate::tset::TSet;

/// テスト用の `TSet` を作成する
///
/// # Arguments
/// * `pairs` - 挿入順のキーと値
pub(crate) fn tset(pairs: &[(&str, Option<&str>)]) -> TSet {
    pairs.iter().copied().collect()
}

/// テスト用のアノテーション表を作成する
///
/// # Arguments
/// * `comments` - キーと生コメントの組
pub(crate) fn annotations(comments: &[(&str, &str)]) -> AnnotationLookup {
    let raw: HashMap<String, String> =
        comments.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    parse_annotations(&raw)
}
