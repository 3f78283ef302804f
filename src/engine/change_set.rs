//! 変更内容 (added / updated / skipped / deleted) の分類

use serde::Serialize;

use crate::engine::invocation::ServiceInvocation;
use crate::tset::TSet;
use crate::tset::ops::{
    CompareMode,
    left_minus_right,
    select_left_distinct,
};

/// 前回のターゲットからの差分
///
/// 新しいターゲットの内容ではなく、今回の実行で起きた変化を表す。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    /// 新しく翻訳されたキー
    pub added: TSet,
    /// 翻訳が前回の値から変わったキー
    pub updated: TSet,
    /// バックエンドが翻訳しなかったキー
    ///
    /// 手動翻訳指定によるスキップ (`RoutedKeys::to_skip`) とは別の概念。
    pub skipped: TSet,
    /// ソースから消えたキー。前回のターゲットがない場合は `None`
    pub deleted: Option<TSet>,
}

impl ChangeSet {
    /// ターゲットの内容に影響する変化があるか
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
            || !self.updated.is_empty()
            || self.deleted.as_ref().is_some_and(|deleted| !deleted.is_empty())
    }
}

/// `compute_change_set` の入力
#[derive(Debug, Clone, Copy)]
pub struct ChangeSetArgs<'a> {
    pub old_target: Option<&'a TSet>,
    pub src: &'a TSet,
    pub invocation: Option<&'a ServiceInvocation>,
}

/// サービス呼び出しの結果を前回のターゲットと比較して分類する
#[must_use]
pub fn compute_change_set(args: ChangeSetArgs<'_>) -> ChangeSet {
    let empty = ServiceInvocation::default();
    let invocation = args.invocation.unwrap_or(&empty);

    let skipped = left_minus_right(&invocation.inputs, &invocation.results);

    let Some(old_target) = args.old_target else {
        return ChangeSet {
            added: invocation.results.clone(),
            updated: TSet::new(),
            skipped,
            deleted: None,
        };
    };

    ChangeSet {
        added: select_left_distinct(&invocation.results, old_target, CompareMode::Keys),
        updated: select_left_distinct(&invocation.results, old_target, CompareMode::Values),
        skipped,
        deleted: Some(left_minus_right(old_target, args.src)),
    }
}
