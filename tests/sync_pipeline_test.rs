//! ファイルを使った同期処理全体のテスト

#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use googletest::prelude::*;
use locale_sync::config::{
    RunConfig,
    SyncSettings,
};
use locale_sync::file_formats::FileFormat;
use locale_sync::services::{
    KeyAsTranslation,
    SyncWithoutTranslate,
};
use locale_sync::{
    TSet,
    run_sync,
};
use tempfile::TempDir;

const SOURCE_PO: &str = r#"msgid ""
msgstr ""
"Language: en\n"

msgid "greeting"
msgstr "Hello"

#. @manual:de
msgid "legal"
msgstr "Terms"

#. @manual:en; brand name
msgid "brand"
msgstr "Acme"

msgid "color"
msgstr "Colour"
"#;

fn po_config(dir: &Path, target_lng: &str) -> RunConfig {
    SyncSettings {
        src_file: dir.join("messages.en.po"),
        src_lng: "en".to_string(),
        src_format: FileFormat::Po,
        target_file: dir.join(format!("messages.{target_lng}.po")),
        target_lng: target_lng.to_string(),
        target_format: FileFormat::Po,
        ..SyncSettings::default()
    }
    .to_run_config()
}

fn keys(tset: &TSet) -> Vec<&str> {
    tset.keys().collect()
}

#[tokio::test]
async fn test_first_run_routes_manual_keys() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("messages.en.po"), SOURCE_PO).unwrap();
    let config = po_config(temp_dir.path(), "de");

    let report = run_sync(&config, &KeyAsTranslation).await.unwrap();

    // legal は de が手動翻訳のため書き出さない。brand は原文をコピーする
    assert_that!(keys(&report.new_target), elements_are![eq(&"greeting"), eq(&"brand"), eq(&"color")]);
    assert_that!(report.new_target.value("greeting"), some(eq("greeting")));
    assert_that!(report.new_target.value("brand"), some(eq("Acme")));
    assert_that!(report.new_target.contains_key("legal"), eq(false));
    assert_that!(report.change_set.added.len(), eq(3));
    assert_that!(report.change_set.deleted, none());

    let written = fs::read_to_string(&config.target_file).unwrap();
    assert_that!(written, contains_substring("\"Language: de\\n\""));
    assert_that!(written, contains_substring("msgid \"brand\"\nmsgstr \"Acme\""));
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("messages.en.po"), SOURCE_PO).unwrap();
    let config = po_config(temp_dir.path(), "de");

    let first = run_sync(&config, &KeyAsTranslation).await.unwrap();
    let second = run_sync(&config, &KeyAsTranslation).await.unwrap();

    assert_that!(second.target_written, eq(false));
    assert_that!(second.change_set.has_changes(), eq(false));
    assert_that!(second.new_target, eq(&first.new_target));
}

#[tokio::test]
async fn test_override_source_is_used_for_manual_keys() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("messages.en.po"), SOURCE_PO).unwrap();
    fs::write(temp_dir.path().join("messages.de.po"), "msgid \"brand\"\nmsgstr \"Acme AG\"\n").unwrap();
    let mut config = po_config(temp_dir.path(), "de-CH");
    config.source_overrides.insert("de-CH".to_string(), "de".to_string());

    let report = run_sync(&config, &SyncWithoutTranslate).await.unwrap();

    assert_that!(report.new_target.value("brand"), some(eq("Acme AG")));
    assert_that!(report.new_target.value("greeting"), some(eq("Hello")));
    // 代替ソースに値がないキーは書き出さない
    assert_that!(report.new_target.contains_key("legal"), eq(false));
}

#[tokio::test]
async fn test_arb_override_source_next_to_source_file() {
    let temp_dir = TempDir::new().unwrap();
    let l10n = temp_dir.path().join("l10n");
    fs::create_dir(&l10n).unwrap();
    fs::write(
        l10n.join("app_en.arb"),
        r#"{
  "@@locale": "en",
  "title": "Welcome",
  "brand": "Acme",
  "@brand": { "description": "@manual:de" }
}"#,
    )
    .unwrap();
    fs::write(l10n.join("app_de.arb"), r#"{"@@locale": "de", "brand": "Acme AG"}"#).unwrap();

    let mut config = SyncSettings {
        src_file: l10n.join("app_en.arb"),
        src_lng: "en".to_string(),
        src_format: FileFormat::Arb,
        target_file: l10n.join("app_de_CH.arb"),
        target_lng: "de-CH".to_string(),
        target_format: FileFormat::Arb,
        ..SyncSettings::default()
    }
    .to_run_config();
    config.source_overrides.insert("de-CH".to_string(), "de".to_string());

    let report = run_sync(&config, &SyncWithoutTranslate).await.unwrap();

    assert_that!(report.new_target.value("brand"), some(eq("Acme AG")));
    assert_that!(report.new_target.value("title"), some(eq("Welcome")));
    let written = fs::read_to_string(&config.target_file).unwrap();
    assert_that!(written, contains_substring("\"brand\": \"Acme AG\""));
}

#[tokio::test]
async fn test_removed_source_keys_are_deleted() {
    let temp_dir = TempDir::new().unwrap();
    let src_file = temp_dir.path().join("en.json");
    let config = SyncSettings {
        src_file: src_file.clone(),
        src_lng: "en".to_string(),
        target_file: temp_dir.path().join("out").join("de.json"),
        target_lng: "de".to_string(),
        ..SyncSettings::default()
    }
    .to_run_config();

    fs::write(&src_file, r#"{"a": "A", "b": "B", "c": "C"}"#).unwrap();
    run_sync(&config, &SyncWithoutTranslate).await.unwrap();

    fs::write(&src_file, r#"{"c": "C", "a": "A"}"#).unwrap();
    let report = run_sync(&config, &SyncWithoutTranslate).await.unwrap();

    assert_that!(report.target_written, eq(true));
    assert_that!(report.change_set.deleted.as_ref().map(keys), some(elements_are![eq(&"b")]));
    let written = fs::read_to_string(&config.target_file).unwrap();
    assert_that!(written, eq("{\n  \"c\": \"C\",\n  \"a\": \"A\"\n}\n"));
}

#[tokio::test]
async fn test_null_target_values_are_filled() {
    let temp_dir = TempDir::new().unwrap();
    let config = SyncSettings {
        src_file: temp_dir.path().join("en.json"),
        src_lng: "en".to_string(),
        target_file: temp_dir.path().join("de.json"),
        target_lng: "de".to_string(),
        ..SyncSettings::default()
    }
    .to_run_config();
    fs::write(&config.src_file, r#"{"a": "A", "b": "B"}"#).unwrap();
    fs::write(&config.target_file, r#"{"a": "A-de", "b": null}"#).unwrap();

    let report = run_sync(&config, &KeyAsTranslation).await.unwrap();

    assert_that!(keys(&report.change_set.updated), elements_are![eq(&"b")]);
    assert_that!(report.new_target.value("a"), some(eq("A-de")));
    assert_that!(report.new_target.value("b"), some(eq("b")));
}
