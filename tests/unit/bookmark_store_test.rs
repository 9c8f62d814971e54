//! Unit tests for the BookmarkStore public API.
//!
//! These tests exercise the store through the `BookmarkStoreTrait` interface,
//! using an in-memory SQLite database unless persistence is under test.

use tempfile::TempDir;
use webworm::database::Database;
use webworm::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use webworm::types::bookmark::{Bookmark, EpisodeStep};
use webworm::types::errors::TrackerError;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn frieren() -> Bookmark {
    Bookmark::new("Frieren", "https://example.org/frieren/episode-3", 3)
}

#[test]
fn test_empty_store_lists_nothing() {
    let db = setup();
    let store = BookmarkStore::new(db.connection());
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn test_insert_returns_stored_record_with_has_new_cleared() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    let mut entry = frieren();
    entry.has_new = true;
    let stored = store.insert(&entry).unwrap();

    assert_eq!(stored, frieren());
    assert_eq!(store.get_all().unwrap(), vec![frieren()]);
}

#[test]
fn test_get_all_keeps_insertion_order() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    for name in ["Zeta", "Alpha", "Mu"] {
        store
            .insert(&Bookmark::new(name, "https://example.org/1", 1))
            .unwrap();
    }

    let names: Vec<String> = store.get_all().unwrap().into_iter().map(|b| b.name).collect();
    assert_eq!(names, ["Zeta", "Alpha", "Mu"]);
}

#[test]
fn test_duplicate_insert_fails_and_keeps_first_record() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    store.insert(&frieren()).unwrap();
    let err = store
        .insert(&Bookmark::new("Frieren", "https://other.example/ep/9", 9))
        .unwrap_err();

    assert!(matches!(err, TrackerError::DuplicateKey(ref n) if n == "Frieren"));
    assert_eq!(store.get_all().unwrap(), vec![frieren()]);
}

#[test]
fn test_advance_moves_episode_url_and_sets_has_new() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.insert(&frieren()).unwrap();

    let updated = store.mutate_episode("Frieren", EpisodeStep::Forward).unwrap();
    assert_eq!(updated.episode, 4);
    assert!(updated.has_new);
    assert_eq!(updated.url, "https://example.org/frieren/episode-4");
    assert_eq!(store.get("Frieren").unwrap(), updated);
}

#[test]
fn test_back_clears_has_new_and_clamps_at_zero() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store
        .insert(&Bookmark::new("Pilot", "https://example.org/pilot?ep=1", 1))
        .unwrap();
    store.mutate_episode("Pilot", EpisodeStep::Forward).unwrap();

    let back = store.mutate_episode("Pilot", EpisodeStep::Back).unwrap();
    assert_eq!(back.episode, 1);
    assert!(!back.has_new);

    store.mutate_episode("Pilot", EpisodeStep::Back).unwrap();
    let clamped = store.mutate_episode("Pilot", EpisodeStep::Back).unwrap();
    assert_eq!(clamped.episode, 0);
    assert_eq!(clamped.url, "https://example.org/pilot?ep=0");
}

#[test]
fn test_mutating_missing_name_is_not_found() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());

    let err = store.mutate_episode("Nope", EpisodeStep::Forward).unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));
    assert!(matches!(
        store.set_has_new("Nope", true).unwrap_err(),
        TrackerError::NotFound(_)
    ));
    assert!(matches!(store.get("Nope").unwrap_err(), TrackerError::NotFound(_)));
}

#[test]
fn test_remove_twice_fails_second_time() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.insert(&frieren()).unwrap();

    store.remove("Frieren").unwrap();
    let err = store.remove("Frieren").unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn test_next_episode() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.insert(&frieren()).unwrap();
    store
        .insert(&Bookmark::new("Static", "https://example.org/list", 5))
        .unwrap();

    assert_eq!(
        store.next_episode("Frieren").unwrap(),
        Some((3, "https://example.org/frieren/episode-4".to_string()))
    );
    assert_eq!(store.next_episode("Static").unwrap(), None);
    assert!(matches!(
        store.next_episode("Missing").unwrap_err(),
        TrackerError::NotFound(_)
    ));
}

#[test]
fn test_next_episode_at_max_has_no_successor() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    let url = format!("https://example.org/ep/{}", i64::MAX);
    store.insert(&Bookmark::new("Endless", &url, i64::MAX)).unwrap();

    assert_eq!(store.next_episode("Endless").unwrap(), None);
}

#[test]
fn test_advance_past_max_is_invalid_input_and_rolls_back() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    let url = format!("https://example.org/ep/{}", i64::MAX);
    let endless = Bookmark::new("Endless", &url, i64::MAX);
    store.insert(&endless).unwrap();

    let err = store
        .mutate_episode("Endless", EpisodeStep::Forward)
        .unwrap_err();
    match err {
        TrackerError::InvalidInput(msg) => assert!(msg.contains("Endless"), "{}", msg),
        other => panic!("expected InvalidInput, got {:?}", other),
    }

    // The UPDATE ran inside the transaction; nothing of it may remain.
    assert_eq!(store.get("Endless").unwrap(), endless);

    let back = store.mutate_episode("Endless", EpisodeStep::Back).unwrap();
    assert_eq!(back.episode, i64::MAX - 1);
    assert!(!back.has_new);
}

#[test]
fn test_zero_padded_url_advances_with_padding() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store
        .insert(&Bookmark::new("Padded", "https://example.org/e/07", 7))
        .unwrap();

    let next = store.mutate_episode("Padded", EpisodeStep::Forward).unwrap();
    assert_eq!(next.url, "https://example.org/e/08");
    assert_eq!(
        store.next_episode("Padded").unwrap(),
        Some((8, "https://example.org/e/09".to_string()))
    );

    for _ in 0..2 {
        store.mutate_episode("Padded", EpisodeStep::Forward).unwrap();
    }
    assert_eq!(store.get("Padded").unwrap().url, "https://example.org/e/10");
}

#[test]
fn test_mark_new_at_current_episode() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.insert(&frieren()).unwrap();

    let marked = store.mark_new_at("Frieren", 3).unwrap();
    assert!(marked.has_new);
    assert_eq!(marked.episode, 3);
}

#[test]
fn test_mark_new_at_stale_episode_leaves_record_untouched() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    store.insert(&frieren()).unwrap();
    store.mutate_episode("Frieren", EpisodeStep::Back).unwrap();

    let current = store.mark_new_at("Frieren", 3).unwrap();
    assert_eq!(current.episode, 2);
    assert!(!current.has_new);
    assert_eq!(store.get("Frieren").unwrap(), current);

    assert!(matches!(
        store.mark_new_at("Missing", 0).unwrap_err(),
        TrackerError::NotFound(_)
    ));
}

#[test]
fn test_negative_episode_rejected_by_store() {
    let db = setup();
    let mut store = BookmarkStore::new(db.connection());
    let err = store
        .insert(&Bookmark::new("Bad", "https://example.org/ep/1", -1))
        .unwrap_err();
    assert!(matches!(err, TrackerError::InvalidInput(_)));
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn test_changes_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bookmarks.db");

    {
        let db = Database::open(&path).unwrap();
        let mut store = BookmarkStore::new(db.connection());
        store.insert(&frieren()).unwrap();
        store.mutate_episode("Frieren", EpisodeStep::Forward).unwrap();
        store
            .insert(&Bookmark::new("Gone", "https://example.org/gone/1", 1))
            .unwrap();
        store.remove("Gone").unwrap();
    }

    let db = Database::open(&path).unwrap();
    let store = BookmarkStore::new(db.connection());
    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].episode, 4);
    assert!(all[0].has_new);
    assert_eq!(all[0].url, "https://example.org/frieren/episode-4");
}

#[test]
fn test_committed_change_survives_unclean_shutdown() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bookmarks.db");

    let db = Database::open(&path).unwrap();
    {
        let mut store = BookmarkStore::new(db.connection());
        store.insert(&frieren()).unwrap();
        store.mutate_episode("Frieren", EpisodeStep::Forward).unwrap();
    }
    // Skip the connection's close and checkpoint, as a killed process would.
    std::mem::forget(db);

    let reopened = Database::open(&path).unwrap();
    let store = BookmarkStore::new(reopened.connection());
    let stored = store.get("Frieren").unwrap();
    assert_eq!(stored.episode, 4);
    assert!(stored.has_new);
}

#[test]
fn test_failed_mutation_leaves_file_unchanged_after_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bookmarks.db");
    let url = format!("https://example.org/ep/{}", i64::MAX);
    let endless = Bookmark::new("Endless", &url, i64::MAX);

    {
        let db = Database::open(&path).unwrap();
        let mut store = BookmarkStore::new(db.connection());
        store.insert(&endless).unwrap();
        assert!(store.mutate_episode("Endless", EpisodeStep::Forward).is_err());
        assert!(store.insert(&endless).is_err());
    }

    let db = Database::open(&path).unwrap();
    let store = BookmarkStore::new(db.connection());
    assert_eq!(store.get_all().unwrap(), vec![endless]);
}
