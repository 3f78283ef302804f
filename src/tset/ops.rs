//! `TSet` 同士の集合演算
//!
//! すべて純粋関数。比較は常に文字列の完全一致で行う。

use super::TSet;

/// `select_left_distinct` の比較モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    /// 左にあって右にないキー（値は無視）
    Keys,
    /// 左にあって、右にないか右の値が null のキー
    KeysAndNullValues,
    /// 両方にあって値が異なるキー
    Values,
}

/// 左にあって右にないキーを返す（値・順序は左に従う）
#[must_use]
pub fn left_minus_right(left: &TSet, right: &TSet) -> TSet {
    left.iter().filter(|(key, _)| !right.contains_key(key)).collect()
}

/// 左のうち、`mode` に従って右と異なるキーを返す（値・順序は左に従う）
#[must_use]
pub fn select_left_distinct(left: &TSet, right: &TSet, mode: CompareMode) -> TSet {
    left.iter()
        .filter(|(key, value)| match mode {
            CompareMode::Keys => !right.contains_key(key),
            CompareMode::KeysAndNullValues => right.value(key).is_none(),
            CompareMode::Values => right.get(key).is_some_and(|right_value| right_value != *value),
        })
        .collect()
}

/// 新しいターゲットの組み立てに必要な入力
#[derive(Debug, Clone, Copy)]
pub struct JoinArgs<'a> {
    /// 今回の翻訳結果
    pub translate_results: &'a TSet,
    /// 前回のターゲット
    pub old_target: Option<&'a TSet>,
    /// 現在のソース
    pub src: &'a TSet,
}

/// ソースのキー順で新しいターゲットを組み立てる
///
/// 各キーについて、翻訳結果があればそれを、なければ前回のターゲットの値を使う。
/// どちらにもないキーは結果に含めない。
#[must_use]
pub fn join_results_preserve_order(args: JoinArgs<'_>) -> TSet {
    let mut joined = TSet::new();
    for key in args.src.keys() {
        if let Some(value) = args.translate_results.get(key) {
            joined.insert(key, value.map(str::to_string));
        } else if let Some(value) = args.old_target.and_then(|target| target.get(key)) {
            joined.insert(key, value.map(str::to_string));
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::test_utils::tset;

    #[googletest::test]
    fn left_minus_right_keeps_left_values_and_order() {
        let left = tset(&[("c", Some("3")), ("a", Some("1")), ("b", Some("2"))]);
        let right = tset(&[("a", Some("x"))]);

        let result = left_minus_right(&left, &right);

        expect_that!(result, eq(&tset(&[("c", Some("3")), ("b", Some("2"))])));
    }

    #[googletest::test]
    fn left_minus_right_with_empty_sides() {
        let some = tset(&[("a", Some("1"))]);

        expect_that!(left_minus_right(&TSet::new(), &some), eq(&TSet::new()));
        expect_that!(left_minus_right(&some, &TSet::new()), eq(&some));
    }

    #[rstest]
    #[case::keys(CompareMode::Keys, &["new"])]
    #[case::keys_and_null(CompareMode::KeysAndNullValues, &["null_right", "new"])]
    #[case::values(CompareMode::Values, &["changed", "null_right"])]
    fn select_left_distinct_modes(#[case] mode: CompareMode, #[case] expected: &[&str]) {
        let left = tset(&[
            ("same", Some("v")),
            ("changed", Some("new value")),
            ("null_right", Some("v")),
            ("new", Some("v")),
        ]);
        let right = tset(&[
            ("same", Some("v")),
            ("changed", Some("old value")),
            ("null_right", None),
            ("only_right", Some("v")),
        ]);

        let result = select_left_distinct(&left, &right, mode);

        assert_eq!(result.keys().collect::<Vec<_>>(), expected);
    }

    #[googletest::test]
    fn select_left_distinct_takes_values_from_left() {
        let left = tset(&[("k", Some("left"))]);
        let right = tset(&[("k", Some("right"))]);

        let result = select_left_distinct(&left, &right, CompareMode::Values);

        expect_that!(result.value("k"), some(eq("left")));
    }

    #[googletest::test]
    fn select_left_distinct_compares_exact_strings() {
        let left = tset(&[("k", Some("Hello"))]);
        let right = tset(&[("k", Some("hello "))]);

        let result = select_left_distinct(&left, &right, CompareMode::Values);

        expect_that!(result.len(), eq(1));
    }

    #[googletest::test]
    fn join_prefers_results_then_old_target_in_source_order() {
        let src = tset(&[("k1", Some("s1")), ("k2", Some("s2")), ("k3", Some("s3"))]);
        let old_target = tset(&[("k3", Some("t3")), ("k2", Some("t2"))]);
        let results = tset(&[("k1", Some("r1")), ("k3", Some("r3"))]);

        let joined = join_results_preserve_order(JoinArgs {
            translate_results: &results,
            old_target: Some(&old_target),
            src: &src,
        });

        expect_that!(
            joined,
            eq(&tset(&[("k1", Some("r1")), ("k2", Some("t2")), ("k3", Some("r3"))]))
        );
    }

    #[googletest::test]
    fn join_drops_keys_without_result_or_previous_value() {
        let src = tset(&[("kept", Some("s")), ("missing", Some("s"))]);
        let results = tset(&[("kept", Some("r"))]);

        let joined = join_results_preserve_order(JoinArgs {
            translate_results: &results,
            old_target: None,
            src: &src,
        });

        expect_that!(joined, eq(&tset(&[("kept", Some("r"))])));
    }

    #[googletest::test]
    fn join_ignores_old_target_keys_absent_from_source() {
        let src = tset(&[("a", Some("s"))]);
        let old_target = tset(&[("stale", Some("t")), ("a", Some("ta"))]);

        let joined = join_results_preserve_order(JoinArgs {
            translate_results: &TSet::new(),
            old_target: Some(&old_target),
            src: &src,
        });

        expect_that!(joined, eq(&tset(&[("a", Some("ta"))])));
    }
}
