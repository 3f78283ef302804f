//! 同期処理の本体
//!
//! 1. 候補キーの抽出
//! 2. 手動翻訳指定による振り分け
//! 3. 通常翻訳
//! 4. 原文コピー
//! 5. 代替ソースからの翻訳
//! 6. 変更内容の分類
//! 7. 新しいターゲットの組み立て
//!
//! 各サービス呼び出しは順番に待つ。並行実行はしない。

use crate::annotation::AnnotationLookup;
use crate::engine::change_set::{
    ChangeSet,
    ChangeSetArgs,
    compute_change_set,
};
use crate::engine::error::CoreError;
use crate::engine::invocation::{
    InvocationBuilder,
    ServiceInvocation,
};
use crate::engine::override_source::OverrideSource;
use crate::engine::routing::{
    RoutingArgs,
    SourceOverrides,
    filter_manual_keys,
};
use crate::matchers::MatcherKind;
use crate::services::{
    InvokeArgs,
    TService,
    invoke_translation_service,
};
use crate::tset::TSet;
use crate::tset::ops::{
    CompareMode,
    JoinArgs,
    join_results_preserve_order,
    select_left_distinct,
};

/// `translate_core` の入力
#[derive(Debug, Clone, Copy)]
pub struct CoreArgs<'a> {
    /// 現在のソース
    pub src: &'a TSet,
    /// 前回のターゲット（初回は `None`）
    pub old_target: Option<&'a TSet>,
    /// ソースのキーごとの翻訳指示
    pub annotations: &'a AnnotationLookup,
    pub src_lng: &'a str,
    pub target_lng: &'a str,
    pub source_overrides: &'a SourceOverrides,
    /// 前回の実行からソースの値が変わったキー（再翻訳する場合のみ）
    pub outdated: Option<&'a TSet>,
    pub matcher: MatcherKind,
    /// 翻訳サービスへの追加指示
    pub prompt: &'a str,
}

/// 同期処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreResults {
    pub change_set: ChangeSet,
    /// 今回のサービス呼び出し（何も送らなかった場合は `None`）
    pub service_invocation: Option<ServiceInvocation>,
    pub new_target: TSet,
}

/// 今回新たに扱う候補キーを抽出する
///
/// 前回のターゲットがなければソースの全キー、あればターゲットにないキーと値が null のキー。
/// `outdated` のキーも候補に加える。順序はソースに従う。
fn extract_candidates(src: &TSet, old_target: Option<&TSet>, outdated: Option<&TSet>) -> TSet {
    let Some(old_target) = old_target else {
        return src.clone();
    };
    let missing = select_left_distinct(src, old_target, CompareMode::KeysAndNullValues);
    let Some(outdated) = outdated.filter(|o| !o.is_empty()) else {
        return missing;
    };
    src.iter()
        .filter(|(key, _)| missing.contains_key(key) || outdated.contains_key(key))
        .collect()
}

/// ソースと前回のターゲットから新しいターゲットを求める
///
/// # Errors
/// - ソースが空の場合
/// - 翻訳サービスが失敗した場合
///
/// 代替ソースが読めない場合はエラーにせず、原文コピーに切り替える。
pub async fn translate_core(
    args: CoreArgs<'_>,
    service: &dyn TService,
    override_source: &dyn OverrideSource,
) -> Result<CoreResults, CoreError> {
    if args.src.is_empty() {
        return Err(CoreError::EmptySource);
    }

    let candidates = extract_candidates(args.src, args.old_target, args.outdated);
    tracing::debug!(candidates = candidates.len(), "Extracted candidate keys");

    let routed = filter_manual_keys(
        &candidates,
        RoutingArgs {
            annotations: args.annotations,
            target_lng: args.target_lng,
            source_overrides: args.source_overrides,
        },
    );

    let mut builder = InvocationBuilder::new();

    if !routed.to_translate.is_empty() {
        let invocation = invoke_translation_service(
            service,
            InvokeArgs {
                inputs: &routed.to_translate,
                src_lng: args.src_lng,
                target_lng: args.target_lng,
                annotations: args.annotations,
                matcher: args.matcher,
                prompt: args.prompt,
            },
        )
        .await?;
        builder.merge(invocation);
    }

    for (key, value) in routed.to_copy_original.iter() {
        builder.insert_copy(key, value);
    }

    if !routed.to_translate_from_override.is_empty() {
        translate_from_override(
            &args,
            &routed.to_translate_from_override,
            service,
            override_source,
            &mut builder,
        )
        .await?;
    }

    let service_invocation = builder.build();

    let change_set = compute_change_set(ChangeSetArgs {
        old_target: args.old_target,
        src: args.src,
        invocation: service_invocation.as_ref(),
    });

    let empty = TSet::new();
    let new_target = join_results_preserve_order(JoinArgs {
        translate_results: service_invocation.as_ref().map_or(&empty, |inv| &inv.results),
        old_target: args.old_target,
        src: args.src,
    });

    Ok(CoreResults { change_set, service_invocation, new_target })
}

/// 代替ソースのテキストを原文として翻訳する
///
/// 代替ソースが読めなければ原文コピーにフォールバックする。
/// 代替ソースに値のないキーは今回は何もしない。
async fn translate_from_override(
    args: &CoreArgs<'_>,
    keys: &TSet,
    service: &dyn TService,
    override_source: &dyn OverrideSource,
    builder: &mut InvocationBuilder,
) -> Result<(), CoreError> {
    let Some(override_lng) = args.source_overrides.get(args.target_lng) else {
        for (key, value) in keys.iter() {
            builder.insert_copy(key, value);
        }
        return Ok(());
    };

    let override_tset = match override_source.read_override(override_lng) {
        Ok(tset) => tset,
        Err(e) => {
            tracing::warn!(
                "Failed to read override source '{}' for '{}', copying original text instead: {}",
                override_lng,
                args.target_lng,
                e
            );
            for (key, value) in keys.iter() {
                builder.insert_copy(key, value);
            }
            return Ok(());
        }
    };

    let inputs: TSet = keys
        .keys()
        .filter_map(|key| {
            override_tset.value(key).filter(|text| !text.is_empty()).map(|text| (key, Some(text)))
        })
        .collect();
    let missing = keys.len() - inputs.len();
    if missing > 0 {
        tracing::debug!(missing, "Override source lacks values for some keys; leaving them untouched");
    }
    if inputs.is_empty() {
        return Ok(());
    }

    let invocation = invoke_translation_service(
        service,
        InvokeArgs {
            inputs: &inputs,
            src_lng: override_lng,
            target_lng: args.target_lng,
            annotations: args.annotations,
            matcher: args.matcher,
            prompt: args.prompt,
        },
    )
    .await?;
    builder.merge(invocation);
    Ok(())
}
