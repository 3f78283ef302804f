//! Flutter ARB (Application Resource Bundle)
//!
//! ```json
//! {
//!   "@@locale": "en",
//!   "title": "Welcome",
//!   "@title": { "description": "@manual:de; Page title" }
//! }
//! ```

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
/// ロケール指定のキー
const LOCALE_KEY: &str = "@@locale";

/// Flutter ARB 形式
#[derive(Debug, Clone, Copy, Default)]
pub struct ArbFormat;

impl TFileFormat for ArbFormat {
    fn read(&self, args: ReadArgs<'_>) -> Result<ParsedFile, FileError> {
        let content = read_text(args.path)?;
        let map = parse_json_object(args.path, &content)?;

        let mut parsed = ParsedFile::default();
        for (key, value) in &map {
            if let Some(target_key) = key.strip_prefix('@') {
                if target_key.starts_with('@') {
                    continue;
                }
                if let Some(description) = value.get("description").and_then(Value::as_str) {
                    parsed.comments.insert(target_key.to_string(), description.to_string());
                }
                continue;
            }

            let text = scalar_to_text(value).ok_or_else(|| {
                FileError::parse(args.path, format!("key '{key}' must have a string value"))
            })?;
            parsed.tset.insert(key.clone(), text);
        }

        if let Some(locale) = map.get(LOCALE_KEY).and_then(Value::as_str)
            && locale != args.lng
        {
            tracing::warn!(
                "'{}' declares locale '{}' but was read as '{}'",
                args.path.display(),
                locale,
                args.lng
            );
        }
        Ok(parsed)
    }

    fn write(&self, args: WriteArgs<'_>) -> Result<(), FileError> {
        let mut map = Map::new();
        map.insert(LOCALE_KEY.to_string(), Value::String(args.lng.to_string()));
        for (key, value) in args.tset.iter() {
            map.insert(key.to_string(), text_to_value(value));
        }
        write_json_object(args.path, map)
    }
}
