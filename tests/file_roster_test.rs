//! File-backed roster repository against a real filesystem.

use incident_intake::adapters::FileRosterRepository;
use incident_intake::domain::errors::RosterError;
use incident_intake::domain::models::{AdminRoster, UserId};
use incident_intake::domain::ports::RosterRepository;

#[tokio::test]
async fn test_missing_file_serves_bootstrap_list() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileRosterRepository::new(dir.path().join("admins.txt"), vec![UserId(42)]);

    let roster = repo.load().await.unwrap();
    assert_eq!(roster.ids(), &[UserId(42)]);
    assert!(!dir.path().join("admins.txt").exists());
}

#[tokio::test]
async fn test_save_then_load_round_trip_and_no_temp_left() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("admins.txt");
    let repo = FileRosterRepository::new(&path, vec![UserId(1)]);

    repo.save(&AdminRoster::from_ids([UserId(42), UserId(7)]))
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "42\n7\n");
    assert!(!dir.path().join("admins.txt.tmp").exists());
    // The file now wins over the bootstrap list.
    assert_eq!(repo.load().await.unwrap().ids(), &[UserId(42), UserId(7)]);
}

#[tokio::test]
async fn test_empty_file_is_empty_roster() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("admins.txt");
    std::fs::write(&path, "").unwrap();
    let repo = FileRosterRepository::new(&path, vec![UserId(1)]);

    assert!(repo.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_entry_falls_back_to_bootstrap_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("admins.txt");
    std::fs::write(&path, "42\nseven\n").unwrap();
    let repo = FileRosterRepository::new(&path, vec![UserId(1)]);

    assert_eq!(repo.load().await.unwrap().ids(), &[UserId(1)]);
    // The damaged file is left for the operator to inspect.
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "42\nseven\n");
}

#[tokio::test]
async fn test_trailing_comment_on_entry_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("admins.txt");
    std::fs::write(&path, "42\n7 # ops lead\n").unwrap();
    let repo = FileRosterRepository::new(&path, vec![UserId(1)]);

    assert_eq!(repo.load().await.unwrap().ids(), &[UserId(42), UserId(7)]);
}

#[tokio::test]
async fn test_save_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("admins.txt");
    let repo = FileRosterRepository::new(&path, Vec::new());

    repo.save(&AdminRoster::from_ids([UserId(3)])).await.unwrap();
    assert_eq!(repo.load().await.unwrap().ids(), &[UserId(3)]);
}

#[tokio::test]
async fn test_unwritable_location_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let repo = FileRosterRepository::new(blocker.join("admins.txt"), Vec::new());

    let err = repo
        .save(&AdminRoster::from_ids([UserId(3)]))
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::Io { .. }));
}
