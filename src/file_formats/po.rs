//! gettext PO
//!
//! キーは `msgid`（`msgctxt` がある場合は `msgctxt` + `\u{4}` + `msgid`）。
//! 空の `msgstr` は未翻訳（`None`）として扱う。
//! `#.` と `# ` のコメントはアノテーションとして読み込む。

use std::fmt::Write as _;

use super::{
    FileError,
    ParsedFile,
    ReadArgs,
    TFileFormat,
    WriteArgs,
    read_text,
    write_text,
};

/// `msgctxt` と `msgid` の区切り（gettext の慣習）
const CONTEXT_SEPARATOR: char = '\u{4}';

/// gettext PO 形式
#[derive(Debug, Clone, Copy, Default)]
pub struct PoFormat;

/// 継続行の書き込み先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// `msgctxt`
    Context,
    /// `msgid`
    Id,
    /// `msgstr` / `msgstr[0]`
    Str,
    /// `msgid_plural` や `msgstr[1]` 以降など読み捨てるフィールド
    Ignored,
}

/// 読み込み中のエントリ
#[derive(Debug, Default)]
struct PendingEntry {
    /// `#.` と `# ` のコメント行
    comments: Vec<String>,
    /// `msgctxt` の値
    context: Option<String>,
    /// `msgid` の値
    id: Option<String>,
    /// `msgstr` の値
    text: Option<String>,
    /// 直前に読んだフィールド
    field: Option<Field>,
}

impl PendingEntry {
    /// `msgid` と `msgstr` が揃っているか
    fn is_complete(&self) -> bool {
        self.id.is_some() && self.text.is_some()
    }

    /// 継続行を直前のフィールドに連結する。連結先がなければ `false`
    fn push_continuation(&mut self, text: &str) -> bool {
        let target = match self.field {
            Some(Field::Context) => self.context.as_mut(),
            Some(Field::Id) => self.id.as_mut(),
            Some(Field::Str) => self.text.as_mut(),
            Some(Field::Ignored) => return true,
            None => None,
        };
        target.map(|s| s.push_str(text)).is_some()
    }

    /// 完成したエントリを `parsed` に追加する（ヘッダーは読み捨てる）
    fn flush_into(&mut self, parsed: &mut ParsedFile) {
        let entry = std::mem::take(self);
        let (Some(id), Some(text)) = (entry.id, entry.text) else {
            return;
        };
        let key = match entry.context {
            Some(context) if !context.is_empty() => format!("{context}{CONTEXT_SEPARATOR}{id}"),
            _ if id.is_empty() => return,
            _ => id,
        };
        if !entry.comments.is_empty() {
            parsed.comments.insert(key.clone(), entry.comments.join("\n"));
        }
        parsed.tset.insert(key, Some(text).filter(|t| !t.is_empty()));
    }
}

/// PO テキストを解析する
fn parse_po(content: &str) -> Result<ParsedFile, String> {
    let mut parsed = ParsedFile::default();
    let mut entry = PendingEntry::default();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        let line_no = index + 1;

        if line.is_empty() {
            entry.flush_into(&mut parsed);
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if entry.is_complete() {
                entry.flush_into(&mut parsed);
            }
            if let Some(text) = annotation_comment(comment) {
                entry.comments.push(text.to_string());
            }
            continue;
        }

        if line.starts_with('"') {
            let text = unquote(line).map_err(|e| format!("line {line_no}: {e}"))?;
            if !entry.push_continuation(&text) {
                return Err(format!("line {line_no}: string without a keyword"));
            }
            continue;
        }

        let (keyword, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| format!("line {line_no}: unexpected '{line}'"))?;
        let value = unquote(rest.trim()).map_err(|e| format!("line {line_no}: {e}"))?;

        match keyword {
            "msgctxt" | "msgid" if entry.is_complete() => {
                entry.flush_into(&mut parsed);
                set_field(&mut entry, keyword, value);
            }
            "msgctxt" | "msgid" | "msgstr" | "msgstr[0]" => set_field(&mut entry, keyword, value),
            "msgid_plural" => entry.field = Some(Field::Ignored),
            other if other.starts_with("msgstr[") => entry.field = Some(Field::Ignored),
            other => return Err(format!("line {line_no}: unknown keyword '{other}'")),
        }
    }
    entry.flush_into(&mut parsed);

    Ok(parsed)
}

/// `#.` は抽出コメント、`# ` は翻訳者コメント。`#,` `#:` `#|` `#~` は読み捨てる
fn annotation_comment(comment: &str) -> Option<&str> {
    let text = match comment.chars().next() {
        Some('.') => comment.get(1..)?,
        Some(c) if c.is_whitespace() => comment,
        _ => return None,
    };
    Some(text.trim()).filter(|t| !t.is_empty())
}

/// キーワードに対応するフィールドへ値を設定する
fn set_field(entry: &mut PendingEntry, keyword: &str, value: String) {
    let (slot, field) = match keyword {
        "msgctxt" => (&mut entry.context, Field::Context),
        "msgid" => (&mut entry.id, Field::Id),
        _ => (&mut entry.text, Field::Str),
    };
    *slot = Some(value);
    entry.field = Some(field);
}

/// 前後の `"` を外してエスケープを戻す
fn unquote(s: &str) -> Result<String, String> {
    let inner = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| format!("expected a quoted string, found '{s}'"))?;

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    Ok(result)
}

/// 引用符で囲み、PO のエスケープを施す
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            _ => result.push(c),
        }
    }
    result.push('"');
    result
}

impl TFileFormat for PoFormat {
    fn read(&self, args: ReadArgs<'_>) -> Result<ParsedFile, FileError> {
        let content = read_text(args.path)?;
        parse_po(&content).map_err(|message| FileError::parse(args.path, message))
    }

    fn write(&self, args: WriteArgs<'_>) -> Result<(), FileError> {
        let mut content = String::new();
        content.push_str("msgid \"\"\nmsgstr \"\"\n");
        content.push_str("\"Content-Type: text/plain; charset=UTF-8\\n\"\n");
        let _ = writeln!(content, "{}", escape(&format!("Language: {}\n", args.lng)));

        for (key, value) in args.tset.iter() {
            content.push('\n');
            let id = match key.split_once(CONTEXT_SEPARATOR) {
                Some((context, id)) => {
                    let _ = writeln!(content, "msgctxt {}", escape(context));
                    id
                }
                None => key,
            };
            let _ = writeln!(content, "msgid {}", escape(id));
            let _ = writeln!(content, "msgstr {}", escape(value.unwrap_or_default()));
        }

        write_text(args.path, &content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::test_utils::tset;

    #[googletest::test]
    fn parses_entries_and_skips_header() {
        let content = r#"
msgid ""
msgstr ""
"Language: en\n"

msgid "Hello"
msgstr "Hello"

msgid "Untranslated"
msgstr ""
"#;

        let parsed = parse_po(content).unwrap();

        expect_that!(parsed.tset, eq(&tset(&[("Hello", Some("Hello")), ("Untranslated", None)])));
    }

    #[googletest::test]
    fn context_becomes_part_of_key() {
        let content = "msgctxt \"menu\"\nmsgid \"File\"\nmsgstr \"File\"\n";

        let parsed = parse_po(content).unwrap();

        expect_that!(parsed.tset.value("menu\u{4}File"), some(eq("File")));
    }

    #[googletest::test]
    fn joins_continuation_lines_and_unescapes() {
        let content = r#"
msgid ""
"Hello "
"World"
msgstr "Line 1\nLine \"2\""
"#;

        let parsed = parse_po(content).unwrap();

        expect_that!(parsed.tset.value("Hello World"), some(eq("Line 1\nLine \"2\"")));
    }

    #[googletest::test]
    fn extracted_and_translator_comments_become_annotations() {
        let content = r#"
#. @manual:de
# Shown on the login page
#: src/login.rs:12
#, fuzzy
msgid "Sign in"
msgstr "Sign in"
msgid "Next"
msgstr "Next"
"#;

        let parsed = parse_po(content).unwrap();

        expect_that!(parsed.comments.get("Sign in"), some(eq("@manual:de\nShown on the login page")));
        expect_that!(parsed.comments.contains_key("Next"), eq(false));
        expect_that!(parsed.tset.len(), eq(2));
    }

    #[googletest::test]
    fn plural_forms_use_first_form() {
        let content = r#"
msgid "One file"
msgid_plural "{n} files"
msgstr[0] "One file"
msgstr[1] "{n} files"
"#;

        let parsed = parse_po(content).unwrap();

        expect_that!(parsed.tset, eq(&tset(&[("One file", Some("One file"))])));
    }

    #[googletest::test]
    fn rejects_unknown_keyword() {
        let result = parse_po("msgfoo \"x\"\n");

        expect_that!(result, err(contains_substring("line 1")));
    }

    #[googletest::test]
    fn writes_header_and_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("de.po");

        PoFormat
            .write(WriteArgs {
                path: &path,
                lng: "de",
                tset: &tset(&[("menu\u{4}File", Some("Datei")), ("Empty", None)]),
            })
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        expect_that!(content, contains_substring("\"Language: de\\n\"\n"));
        expect_that!(content, contains_substring("msgctxt \"menu\"\nmsgid \"File\"\nmsgstr \"Datei\"\n"));
        expect_that!(content, contains_substring("msgid \"Empty\"\nmsgstr \"\"\n"));
    }
}
