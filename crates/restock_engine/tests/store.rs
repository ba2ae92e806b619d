use std::fs;

use restock_core::{StateMap, StockStatus, TargetState};
use restock_engine::{ensure_state_dir, AtomicFileWriter, PersistError, RonFileStore, StateStore};
use tempfile::TempDir;

fn sample_state() -> TargetState {
    TargetState {
        status: StockStatus::In,
        in_since_ts: 1_700_000_000,
        in_streak: 2,
        err_streak: 0,
        last_err_notify_ts: 0,
        last_in_notify_attempt_ts: 1_700_000_000,
        last_in_notify_ok_ts: 1_700_000_000,
        last_used_url: "https://shop.example/widget".to_string(),
        last_reason: "confirmed_in_stock".to_string(),
        ts: 1_700_000_000,
    }
}

#[test]
fn missing_snapshot_loads_as_empty_map() {
    let temp = TempDir::new().unwrap();
    let store = RonFileStore::new(temp.path());

    let map = store.load().unwrap();
    assert!(map.is_empty());
}

#[test]
fn snapshot_roundtrip_preserves_records() {
    let temp = TempDir::new().unwrap();
    let store = RonFileStore::new(temp.path());

    let mut map = StateMap::new();
    map.insert("widget".to_string(), sample_state());
    map.insert("gadget".to_string(), TargetState::new());
    store.save(&map).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, map);
}

#[test]
fn corrupt_snapshot_is_a_fatal_load_error() {
    let temp = TempDir::new().unwrap();
    let store = RonFileStore::new(temp.path());
    fs::write(temp.path().join(".restock_state.ron"), "(targets: oops").unwrap();

    let result = store.load();
    assert!(matches!(result, Err(PersistError::Malformed(_))));
}

#[test]
fn save_overwrites_previous_snapshot() {
    let temp = TempDir::new().unwrap();
    let store = RonFileStore::new(temp.path());

    let mut map = StateMap::new();
    map.insert("widget".to_string(), sample_state());
    store.save(&map).unwrap();

    map.remove("widget");
    map.insert("gadget".to_string(), TargetState::new());
    store.save(&map).unwrap();

    let loaded = store.load().unwrap();
    assert!(!loaded.contains_key("widget"));
    assert!(loaded.contains_key("gadget"));
}

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_and_is_atomic() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("snapshot.ron", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "snapshot.ron");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    // Replace existing
    let second = writer.write("snapshot.ron", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("snapshot.ron", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("snapshot.ron").exists());
}
