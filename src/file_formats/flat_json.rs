//! Flat JSON: `{"key": "text"}`

use std::path::Path;

use serde_json::{
    Map,
    Value,
};

use super::{
    FileError,
    ParsedFile,
    ReadArgs,
    TFileFormat,
    WriteArgs,
    read_text,
    write_text,
};
use crate::tset::TSet;

/// 1 階層の JSON オブジェクト
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatJsonFormat;

/// JSON テキストをトップレベルのオブジェクトとして読み込む
///
/// 空のファイルは空のオブジェクトとして扱う。
pub(super) fn parse_json_object(path: &Path, content: &str) -> Result<Map<String, Value>, FileError> {
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(FileError::parse(path, "expected a JSON object at the top level")),
        Err(e) => Err(FileError::parse(path, e.to_string())),
    }
}

/// JSON オブジェクトを整形して書き出す
pub(super) fn write_json_object(path: &Path, map: Map<String, Value>) -> Result<(), FileError> {
    let mut content = serde_json::to_string_pretty(&Value::Object(map))
        .map_err(|e| FileError::serialize(path, e.to_string()))?;
    content.push('\n');
    write_text(path, &content)
}

/// スカラー値を文字列に変換する（null は `None`）
pub(super) fn scalar_to_text(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        Value::Bool(_) | Value::Number(_) => Some(Some(value.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// `None` を null として JSON 値に変換する
pub(super) fn text_to_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |text| Value::String(text.to_string()))
}

impl TFileFormat for FlatJsonFormat {
    fn read(&self, args: ReadArgs<'_>) -> Result<ParsedFile, FileError> {
        let content = read_text(args.path)?;
        let map = parse_json_object(args.path, &content)?;

        let mut tset = TSet::new();
        for (key, value) in &map {
            let text = scalar_to_text(value).ok_or_else(|| {
                FileError::parse(
                    args.path,
                    format!("key '{key}' has a nested value; use the nested-json format instead"),
                )
            })?;
            tset.insert(key.clone(), text);
        }
        Ok(ParsedFile::without_comments(tset))
    }

    fn write(&self, args: WriteArgs<'_>) -> Result<(), FileError> {
        let map: Map<String, Value> =
            args.tset.iter().map(|(key, value)| (key.to_string(), text_to_value(value))).collect();
        write_json_object(args.path, map)
    }
}
