//! 順序付きテキストマッピング (`TSet`)
//!
//! 全コンポーネント間でやり取りされる「キー → 値 (nullable)」のマッピング。
//! 反復順は挿入順で、ターゲットファイルに書き出されるキー順を決める。

pub mod ops;

use indexmap::IndexMap;
use serde::{
    Deserialize,
    Serialize,
};

/// キーの挿入順を保持するテキストマッピング
///
/// 値が `None` のエントリは「キーは存在するが、まだテキストがない」状態を表す。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TSet {
    /// キー → 値
    entries: IndexMap<String, Option<String>>,
}

impl TSet {
    /// 空のマッピングを作成
    #[must_use]
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// エントリを追加する
    ///
    /// 既存キーの場合は値のみ更新し、位置は変えない。
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.insert(key.into(), value);
    }

    /// エントリを削除する（残りのキー順は保持）
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.entries.shift_remove(key)
    }

    /// キーのエントリを取得
    ///
    /// - `None`: キーが存在しない
    /// - `Some(None)`: キーは存在するが値が null
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries.get(key).map(Option::as_deref)
    }

    /// キーの値を取得（キー不在と null 値を区別しない）
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 挿入順にエントリを走査
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// 挿入順にキーを走査
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// 別のマッピングのエントリをすべて取り込む（既存キーは上書き）
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }
}

/// 順序を含めて比較する
///
/// `IndexMap` の `PartialEq` は順序を無視するため、手動で実装している。
impl PartialEq for TSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for TSet {}

impl FromIterator<(String, Option<String>)> for TSet {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl<'a> FromIterator<(&'a str, Option<&'a str>)> for TSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, Option<&'a str>)>>(iter: I) -> Self {
        iter.into_iter().map(|(k, v)| (k.to_string(), v.map(str::to_string))).collect()
    }
}

impl IntoIterator for TSet {
    type Item = (String, Option<String>);
    type IntoIter = indexmap::map::IntoIter<String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn insert_keeps_position_of_existing_key() {
        let mut tset = TSet::new();
        tset.insert("a", Some("1".to_string()));
        tset.insert("b", Some("2".to_string()));
        tset.insert("a", Some("3".to_string()));

        expect_that!(tset.keys().collect::<Vec<_>>(), elements_are![eq(&"a"), eq(&"b")]);
        expect_that!(tset.value("a"), some(eq("3")));
    }

    #[googletest::test]
    fn get_distinguishes_missing_key_from_null_value() {
        let tset: TSet = [("a", None), ("b", Some("x"))].into_iter().collect();

        expect_that!(tset.get("a"), some(none()));
        expect_that!(tset.get("b"), some(some(eq("x"))));
        expect_that!(tset.get("c"), none());
        expect_that!(tset.value("a"), none());
    }

    #[googletest::test]
    fn remove_preserves_order_of_remaining_keys() {
        let mut tset: TSet =
            [("a", Some("1")), ("b", Some("2")), ("c", Some("3"))].into_iter().collect();

        let removed = tset.remove("b");

        expect_that!(removed, some(some(eq("2"))));
        expect_that!(tset.keys().collect::<Vec<_>>(), elements_are![eq(&"a"), eq(&"c")]);
    }

    #[googletest::test]
    fn equality_is_order_sensitive() {
        let ab: TSet = [("a", Some("1")), ("b", Some("2"))].into_iter().collect();
        let ba: TSet = [("b", Some("2")), ("a", Some("1"))].into_iter().collect();
        let ab2 = ab.clone();

        expect_that!(ab == ba, eq(false));
        expect_that!(ab == ab2, eq(true));
    }

    #[googletest::test]
    fn serializes_as_ordered_json_object() {
        let tset: TSet = [("z", Some("last")), ("a", None)].into_iter().collect();

        let json = serde_json::to_string(&tset).unwrap();

        expect_that!(json, eq(r#"{"z":"last","a":null}"#));
    }
}
