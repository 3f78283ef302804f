//! キーごとのコメントから翻訳指示を取り出すパーサー
//!
//! コメントは改行と `;` で区切られた断片の列として扱う。
//!
//! - `@manual:de,zh-Hans`: 指定言語では自動翻訳しない
//! - `@context:...`: 翻訳サービスへ渡す補足情報
//! - `@` で始まらない断片: そのまま補足情報として扱う
//! - その他の `@` 断片: 無視する（将来の拡張用）

use std::collections::HashMap;

/// 手動翻訳言語の指定
const MANUAL_DIRECTIVE: &str = "@manual:";
/// 補足情報の指定
const CONTEXT_DIRECTIVE: &str = "@context:";
/// 補足情報の断片を連結する区切り
const CONTEXT_JOINER: &str = " ";

/// 1 つのソースキーに付いた翻訳指示
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    /// 自動翻訳の対象外とする言語コード
    pub manual_languages: Vec<String>,
    /// 翻訳サービスへ渡す補足情報
    pub context: String,
}

impl Annotation {
    /// `language` が手動翻訳言語として指定されているか
    #[must_use]
    pub fn is_manual_for(&self, language: &str) -> bool {
        self.manual_languages.iter().any(|lng| lng == language)
    }

    /// 手動翻訳言語が 1 つ以上指定されているか
    #[must_use]
    pub fn has_manual_languages(&self) -> bool {
        !self.manual_languages.is_empty()
    }
}

/// キー → 翻訳指示
pub type AnnotationLookup = HashMap<String, Annotation>;

/// コメント文字列を翻訳指示に変換する
///
/// 不正な入力でもエラーにはならない。`@manual:` が複数ある場合は最後のものが有効。
#[must_use]
pub fn parse_annotation(comment: Option<&str>) -> Annotation {
    let mut annotation = Annotation::default();
    let Some(comment) = comment else {
        return annotation;
    };

    let mut context_parts: Vec<&str> = Vec::new();
    let fragments = comment
        .lines()
        .flat_map(|line| line.split(';'))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty());

    for fragment in fragments {
        if let Some(rest) = fragment.strip_prefix(MANUAL_DIRECTIVE) {
            annotation.manual_languages = rest
                .split(',')
                .map(str::trim)
                .filter(|lng| !lng.is_empty())
                .map(str::to_string)
                .collect();
        } else if let Some(rest) = fragment.strip_prefix(CONTEXT_DIRECTIVE) {
            let rest = rest.trim();
            if !rest.is_empty() {
                context_parts.push(rest);
            }
        } else if fragment.starts_with('@') {
            tracing::trace!("Ignoring unknown directive: {}", fragment);
        } else {
            context_parts.push(fragment);
        }
    }

    annotation.context = context_parts.join(CONTEXT_JOINER);
    annotation
}

/// ソースファイルの生コメント表から翻訳指示表を作成する
///
/// 実行ごとに作り直す。キャッシュはしない。
#[must_use]
pub fn parse_annotations(comments: &HashMap<String, String>) -> AnnotationLookup {
    comments
        .iter()
        .map(|(key, comment)| (key.clone(), parse_annotation(Some(comment))))
        .filter(|(_, annotation)| annotation.has_manual_languages() || !annotation.context.is_empty())
        .collect()
}
