use super::{JsonFileStore, Settings, SettingsStore};
use crate::geometry::Corner;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_partial_document_keeps_other_defaults() {
    let settings = Settings::merged(Some(&json!({ "opened": false })));
    assert!(!settings.opened);
    assert_eq!(settings.position, Corner::TopRight);
}

#[test]
fn test_stored_position_is_used() {
    let settings = Settings::merged(Some(&json!({ "position": "bottom-left" })));
    assert!(settings.opened);
    assert_eq!(settings.position, Corner::BottomLeft);
}

#[test]
fn test_unknown_position_falls_back() {
    let settings = Settings::merged(Some(&json!({ "opened": false, "position": "middle" })));
    assert!(!settings.opened);
    assert_eq!(settings.position, Corner::TopRight);
}

#[test]
fn test_wrong_types_fall_back() {
    let settings = Settings::merged(Some(&json!({ "opened": "yes", "position": 3 })));
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_missing_or_non_object_document_uses_defaults() {
    assert_eq!(Settings::merged(None), Settings::default());
    assert_eq!(Settings::merged(Some(&json!([1, 2]))), Settings::default());
    assert_eq!(Settings::merged(Some(&json!(null))), Settings::default());
}

#[test]
fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("data.json");
    let mut store = JsonFileStore::new(&path);
    assert!(store.load().unwrap().is_none(), "missing file reads as nothing");

    let settings = Settings {
        opened: false,
        position: Corner::BottomRight,
    };
    store.save(&settings).unwrap();

    let stored = store.load().unwrap();
    assert_eq!(
        stored,
        Some(json!({ "opened": false, "position": "bottom-right" }))
    );
    assert_eq!(Settings::merged(stored.as_ref()), settings);
}

#[test]
fn test_file_store_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    fs::write(&path, "not json").unwrap();

    let store = JsonFileStore::new(&path);
    assert!(store.load().is_err());
}
