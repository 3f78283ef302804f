//! 代替ソース言語ファイルの解決

use std::path::{
    Path,
    PathBuf,
};

use crate::file_formats::{
    FileError,
    FileFormat,
    read_source_file,
};
use crate::tset::TSet;

/// 代替ソース言語のマッピングを提供する
pub trait OverrideSource: Send + Sync {
    /// `language` のソースマッピングを読み込む
    ///
    /// # Errors
    /// ファイルが存在しない、または読み込めない場合
    fn read_override(&self, language: &str) -> Result<TSet, FileError>;
}

/// ソースファイルのパスから代替ソースファイルのパスを求める
///
/// ディレクトリと拡張子はそのままで、ファイル名の言語部分だけを置き換える。
/// 言語コードは `.` `_` `-` で区切られている必要があり、複数ある場合は最後のものを使う。
/// ファイル名に言語コードが含まれない場合はファイル名全体を置き換える。
///
/// # Examples
/// - `locales/en.po` + `zh-Hans` → `locales/zh-Hans.po`
/// - `i18n/messages.en.json` + `de` → `i18n/messages.de.json`
/// - `l10n/app_en.arb` + `zh-Hans` → `l10n/app_zh-Hans.arb`
#[must_use]
pub fn override_source_path(src_file: &Path, src_lng: &str, override_lng: &str) -> PathBuf {
    let stem = src_file.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();

    let new_stem =
        replace_language(&stem, src_lng, override_lng).unwrap_or_else(|| override_lng.to_string());

    let file_name = src_file
        .extension()
        .map_or_else(|| new_stem.clone(), |ext| format!("{new_stem}.{}", ext.to_string_lossy()));
    src_file.with_file_name(file_name)
}

/// `stem` 中の最後の `src_lng` を `override_lng` に置き換える
fn replace_language(stem: &str, src_lng: &str, override_lng: &str) -> Option<String> {
    if src_lng.is_empty() {
        return None;
    }
    let is_separator = |c: Option<char>| c.is_none_or(|c| matches!(c, '.' | '_' | '-'));

    let (prefix, suffix) = stem.rmatch_indices(src_lng).find_map(|(start, _)| {
        let prefix = stem.get(..start)?;
        let suffix = stem.get(start + src_lng.len()..)?;
        (is_separator(prefix.chars().next_back()) && is_separator(suffix.chars().next()))
            .then_some((prefix, suffix))
    })?;
    Some(format!("{prefix}{override_lng}{suffix}"))
}

/// ソースファイルと同じ形式・同じディレクトリから代替ソースを読み込む
#[derive(Debug, Clone, Copy)]
pub struct FileOverrideSource<'a> {
    /// 主ソースファイル
    pub src_file: &'a Path,
    /// 主ソースの言語
    pub src_lng: &'a str,
    /// 主ソースのファイル形式
    pub format: FileFormat,
}

impl OverrideSource for FileOverrideSource<'_> {
    fn read_override(&self, language: &str) -> Result<TSet, FileError> {
        let path = override_source_path(self.src_file, self.src_lng, language);
        tracing::debug!("Reading override source from {}", path.display());
        read_source_file(&path, language, self.format).map(|parsed| parsed.tset)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    #[case("locales/en.po", "en", "zh-Hans", "locales/zh-Hans.po")]
    #[case("locales/en.json", "en", "de", "locales/de.json")]
    #[case("i18n/messages.en.json", "en", "de", "i18n/messages.de.json")]
    #[case("l10n/app_en.arb", "en", "zh-Hans", "l10n/app_zh-Hans.arb")]
    #[case("i18n/messages_en.json", "en", "de", "i18n/messages_de.json")]
    #[case("i18n/en-US.json", "en-US", "de-DE", "i18n/de-DE.json")]
    #[case("i18n/app.en.messages.po", "en", "fr", "i18n/app.fr.messages.po")]
    #[case("strings/ten_en.json", "en", "de", "strings/ten_de.json")]
    #[case("/abs/path/source.arb", "en", "ja", "/abs/path/ja.arb")]
    #[case("noext", "en", "fr", "fr")]
    fn derives_override_path(
        #[case] src: &str,
        #[case] src_lng: &str,
        #[case] override_lng: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(override_source_path(Path::new(src), src_lng, override_lng), PathBuf::from(expected));
    }

    #[googletest::test]
    fn reads_override_file_next_to_source() {
        let temp_dir = TempDir::new().unwrap();
        let src_file = temp_dir.path().join("en.json");
        fs::write(&src_file, r#"{"hello": "Hello"}"#).unwrap();
        fs::write(temp_dir.path().join("zh-Hans.json"), r#"{"hello": "你好"}"#).unwrap();

        let source = FileOverrideSource { src_file: &src_file, src_lng: "en", format: FileFormat::FlatJson };
        let tset = source.read_override("zh-Hans").unwrap();

        expect_that!(tset.value("hello"), some(eq("你好")));
    }

    #[googletest::test]
    fn reads_arb_override_with_language_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let src_file = temp_dir.path().join("app_en.arb");
        fs::write(&src_file, r#"{"@@locale": "en", "brand": "Acme"}"#).unwrap();
        fs::write(temp_dir.path().join("app_de.arb"), r#"{"@@locale": "de", "brand": "Acme AG"}"#)
            .unwrap();

        let source = FileOverrideSource { src_file: &src_file, src_lng: "en", format: FileFormat::Arb };
        let tset = source.read_override("de").unwrap();

        expect_that!(tset.value("brand"), some(eq("Acme AG")));
    }

    #[googletest::test]
    fn missing_override_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let src_file = temp_dir.path().join("en.json");

        let source = FileOverrideSource { src_file: &src_file, src_lng: "en", format: FileFormat::FlatJson };

        expect_that!(source.read_override("zh-Hans"), err(anything()));
    }
}
