//! 補間プレースホルダーの保護
//!
//! 翻訳サービスへ送る前に `{name}` や `%s` などを不透明なトークンへ置き換え、
//! 結果を受け取った後に元へ戻す。

use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};

/// プレースホルダーの書式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatcherKind {
    /// 置き換えない
    #[default]
    None,
    /// `{name}`
    Icu,
    /// `{{name}}`
    I18next,
    /// `%s`, `%d`, `%1$s`
    Sprintf,
}

/// ICU MessageFormat の `{name}`
#[allow(clippy::expect_used)]
static ICU_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("valid ICU placeholder pattern"));

/// i18next の `{{name}}`
#[allow(clippy::expect_used)]
static I18NEXT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}").expect("valid i18next placeholder pattern"));

/// printf 形式の変換指定子
#[allow(clippy::expect_used)]
static SPRINTF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(?:\d+\$)?[-+ 0#]*\d*(?:\.\d+)?[sdifuxXoegcG@]")
        .expect("valid sprintf placeholder pattern")
});

impl MatcherKind {
    /// プレースホルダーを検出する正規表現。`None` なら保護しない
    fn pattern(self) -> Option<&'static Regex> {
        match self {
            Self::None => None,
            Self::Icu => Some(LazyLock::force(&ICU_PATTERN)),
            Self::I18next => Some(LazyLock::force(&I18NEXT_PATTERN)),
            Self::Sprintf => Some(LazyLock::force(&SPRINTF_PATTERN)),
        }
    }
}

/// 置き換えたプレースホルダー 1 つ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacer {
    /// 元のプレースホルダー
    pub placeholder: String,
    /// 置き換え後のトークン
    pub token: String,
}

/// プレースホルダーを置き換えたテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedText {
    /// トークン置き換え後のテキスト
    pub text: String,
    /// 置き換えた順のプレースホルダー
    pub replacers: Vec<Replacer>,
}

/// `index` 番目のプレースホルダーに対応するトークン
fn token(index: usize) -> String {
    format!("<x id=\"{index}\"/>")
}

/// プレースホルダーをトークンへ置き換える
#[must_use]
pub fn protect_placeholders(text: &str, matcher: MatcherKind) -> ProtectedText {
    let Some(pattern) = matcher.pattern() else {
        return ProtectedText { text: text.to_string(), replacers: Vec::new() };
    };

    let mut replacers = Vec::new();
    let protected = pattern.replace_all(text, |caps: &regex::Captures<'_>| {
        let token = token(replacers.len());
        let placeholder = caps.get(0).map_or_else(String::new, |m| m.as_str().to_string());
        replacers.push(Replacer { placeholder, token: token.clone() });
        token
    });

    ProtectedText { text: protected.into_owned(), replacers }
}

/// トークンを元のプレースホルダーへ戻す
///
/// サービスが落としたトークンは戻しようがないため、そのまま欠落する。
#[must_use]
pub fn restore_placeholders(text: &str, replacers: &[Replacer]) -> String {
    replacers
        .iter()
        .fold(text.to_string(), |acc, replacer| acc.replace(&replacer.token, &replacer.placeholder))
}
