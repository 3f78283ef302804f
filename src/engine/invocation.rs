//! 翻訳サービス呼び出し結果の蓄積

use crate::tset::TSet;

/// 翻訳バックエンドへ送ったキーと、返ってきた結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceInvocation {
    /// 送信したキーと原文
    pub inputs: TSet,
    /// 返ってきた翻訳
    pub results: TSet,
}

/// 翻訳・原文コピー・代替ソース翻訳の結果を 1 つにまとめる
///
/// 何も追加されなければ `build` は `None` を返す。
#[derive(Debug, Default)]
pub struct InvocationBuilder {
    /// これまでの蓄積
    invocation: Option<ServiceInvocation>,
}

impl InvocationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// サービス呼び出しの結果を取り込む
    pub fn merge(&mut self, invocation: ServiceInvocation) {
        let current = self.invocation.get_or_insert_with(ServiceInvocation::default);
        current.inputs.extend(invocation.inputs);
        current.results.extend(invocation.results);
    }

    /// 原文をそのまま翻訳結果として登録する
    ///
    /// 原文が null のキーは入力にのみ登録する（結果がないため skipped 扱いになる）。
    pub fn insert_copy(&mut self, key: &str, source_value: Option<&str>) {
        let current = self.invocation.get_or_insert_with(ServiceInvocation::default);
        current.inputs.insert(key, source_value.map(str::to_string));
        if let Some(value) = source_value {
            current.results.insert(key, Some(value.to_string()));
        }
    }

    #[must_use]
    pub fn build(self) -> Option<ServiceInvocation> {
        self.invocation
    }
}
