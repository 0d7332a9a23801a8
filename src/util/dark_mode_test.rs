use super::*;
use crate::storage::{FileStorage, MemoryStorage};

#[test]
fn read_preference_defaults_to_light() {
    assert!(!read_preference(&MemoryStorage::new()));
}

#[test]
fn read_preference_only_accepts_true() {
    let storage = MemoryStorage::new();
    storage.set_item(DARK_MODE_KEY, "yes").unwrap();
    assert!(!read_preference(&storage));
    storage.set_item(DARK_MODE_KEY, "true").unwrap();
    assert!(read_preference(&storage));
}

#[test]
fn toggle_flips_and_persists() {
    let storage = MemoryStorage::new();
    assert!(toggle(&storage, false));
    assert_eq!(storage.get_item(DARK_MODE_KEY).as_deref(), Some("true"));
    assert!(!toggle(&storage, true));
    assert_eq!(storage.get_item(DARK_MODE_KEY).as_deref(), Some("false"));
}

#[test]
fn toggle_survives_fresh_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    toggle(&FileStorage::new(dir.path()), false);
    assert!(read_preference(&FileStorage::new(dir.path())));
}

#[test]
fn root_class_marks_light_mode_only() {
    assert_eq!(root_class(false), Some(LIGHT_MODE_CLASS));
    assert_eq!(root_class(true), None);
}
