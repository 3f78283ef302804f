//! Nested JSON: `{"common": {"hello": "Hello"}}`

use serde_json::{
    Map,
    Value,
};

use super::flat_json::{
    parse_json_object,
    scalar_to_text,
    text_to_value,
    write_json_object,
};
use super::{
    FileError,
    ParsedFile,
    ReadArgs,
    TFileFormat,
    WriteArgs,
    read_text,
};
use crate::tset::TSet;

/// ネストしたキーの区切り
const KEY_SEPARATOR: &str = ".";

/// ネストした JSON オブジェクト
///
/// 読み込み時にキーを `.` で平坦化し、書き出し時に元の階層へ戻す。
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedJsonFormat;

/// Flatten nested JSON object into dot-separated key map.
///
/// Key order follows the document order.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use locale_sync::file_formats::flatten_json;
///
/// let json = json!({
///     "common": {
///         "hello": "Hello",
///         "goodbye": null
///     }
/// });
///
/// let flattened = flatten_json(&json, ".", None);
/// assert_eq!(flattened.value("common.hello"), Some("Hello"));
/// assert_eq!(flattened.get("common.goodbye"), Some(None));
/// ```
#[must_use]
pub fn flatten_json(json: &Value, separator: &str, prefix: Option<&str>) -> TSet {
    let mut result = TSet::new();
    flatten_json_value(json, separator, prefix, &mut result);
    result
}

/// `json` を再帰的にたどり、文字列・null・スカラー値を `result` に追加する
fn flatten_json_value(json: &Value, separator: &str, prefix: Option<&str>, result: &mut TSet) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.insert(key, scalar_to_text(json).flatten());
            }
        }
    }
}

/// 平坦化されたキーをネストしたオブジェクトへ戻す
///
/// 同じパスが値とオブジェクトの両方として使われている場合はエラー。
fn unflatten(tset: &TSet, separator: &str) -> Result<Map<String, Value>, String> {
    let mut root = Map::new();
    for (key, value) in tset.iter() {
        let segments: Vec<&str> = key.split(separator).collect();
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for segment in parents {
            let entry =
                current.entry((*segment).to_string()).or_insert_with(|| Value::Object(Map::new()));
            let Value::Object(child) = entry else {
                return Err(format!("key '{key}' conflicts with a value at '{segment}'"));
            };
            current = child;
        }

        if matches!(current.get(*leaf), Some(Value::Object(_))) {
            return Err(format!("key '{key}' conflicts with nested keys below it"));
        }
        current.insert((*leaf).to_string(), text_to_value(value));
    }
    Ok(root)
}

impl TFileFormat for NestedJsonFormat {
    fn read(&self, args: ReadArgs<'_>) -> Result<ParsedFile, FileError> {
        let content = read_text(args.path)?;
        let map = parse_json_object(args.path, &content)?;
        Ok(ParsedFile::without_comments(flatten_json(&Value::Object(map), KEY_SEPARATOR, None)))
    }

    fn write(&self, args: WriteArgs<'_>) -> Result<(), FileError> {
        let map = unflatten(args.tset, KEY_SEPARATOR)
            .map_err(|message| FileError::serialize(args.path, message))?;
        write_json_object(args.path, map)
    }
}
