//! 手動翻訳指定に基づく候補キーの振り分け

use std::collections::HashMap;

use crate::annotation::{
    Annotation,
    AnnotationLookup,
};
use crate::tset::TSet;

/// ターゲット言語 → 代替ソース言語 (例: `zh-Hant` → `zh-Hans`)
pub type SourceOverrides = HashMap<String, String>;

/// 候補キー 1 つの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualRoute {
    /// 通常どおり翻訳する
    Translate,
    /// ターゲット言語が手動翻訳指定されているため何もしない
    Skip,
    /// 原文をそのまま訳文とする
    CopyOriginal,
    /// 代替ソース言語のテキストから翻訳する
    TranslateFromOverride,
}

/// 候補キー 1 つの扱いを決める
///
/// | 手動言語 | ターゲットを含む | 代替ソースあり | 結果 |
/// |---------|----------------|--------------|------|
/// | なし     | -              | -            | `Translate` |
/// | あり     | はい           | -            | `Skip` |
/// | あり     | いいえ         | はい         | `TranslateFromOverride` |
/// | あり     | いいえ         | いいえ       | `CopyOriginal` |
#[must_use]
pub fn route_key(
    annotation: Option<&Annotation>,
    target_lng: &str,
    source_overrides: &SourceOverrides,
) -> ManualRoute {
    let Some(annotation) = annotation.filter(|a| a.has_manual_languages()) else {
        return ManualRoute::Translate;
    };
    if annotation.is_manual_for(target_lng) {
        ManualRoute::Skip
    } else if source_overrides.contains_key(target_lng) {
        ManualRoute::TranslateFromOverride
    } else {
        ManualRoute::CopyOriginal
    }
}

/// `filter_manual_keys` の入力
#[derive(Debug, Clone, Copy)]
pub struct RoutingArgs<'a> {
    pub annotations: &'a AnnotationLookup,
    pub target_lng: &'a str,
    pub source_overrides: &'a SourceOverrides,
}

/// 振り分け結果
///
/// 4 つのバケットは互いに素で、和集合は候補キー全体と一致する。
/// 各値はソースの原文。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutedKeys {
    pub to_translate: TSet,
    pub to_skip: TSet,
    pub to_copy_original: TSet,
    pub to_translate_from_override: TSet,
}

/// 候補キーを 4 つのバケットに振り分ける
#[must_use]
pub fn filter_manual_keys(candidates: &TSet, args: RoutingArgs<'_>) -> RoutedKeys {
    let mut routed = RoutedKeys::default();
    for (key, value) in candidates.iter() {
        let route = route_key(args.annotations.get(key), args.target_lng, args.source_overrides);
        let bucket = match route {
            ManualRoute::Translate => &mut routed.to_translate,
            ManualRoute::Skip => &mut routed.to_skip,
            ManualRoute::CopyOriginal => &mut routed.to_copy_original,
            ManualRoute::TranslateFromOverride => &mut routed.to_translate_from_override,
        };
        bucket.insert(key, value.map(str::to_string));
    }

    tracing::debug!(
        to_translate = routed.to_translate.len(),
        to_skip = routed.to_skip.len(),
        to_copy_original = routed.to_copy_original.len(),
        to_translate_from_override = routed.to_translate_from_override.len(),
        "Routed candidate keys"
    );
    routed
}
