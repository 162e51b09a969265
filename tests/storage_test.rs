//! Integration tests for SQLite storage
//!
//! Run with: cargo test --test storage_test

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

use common::TestDb;
use filelink::broadcast::UserDirectory;
use filelink::links::LinkKind;
use filelink::storage::files::{
    add_file_record, count_files, get_file, get_user_files, increment_download_count, FileRecord, USER_FILES_LIMIT,
};
use filelink::storage::streams::{add_stream_record, get_streams_for_file, increment_stream_views};
use filelink::storage::users::{
    add_user, delete_user, get_all_users, get_user, is_user_exist, total_users_count, update_user_activity,
};
use filelink::storage::SqliteUserDirectory;

fn record(file_id: &str, user_id: i64) -> FileRecord {
    FileRecord {
        file_id: file_id.to_string(),
        file_name: format!("{}.bin", file_id),
        file_size: 42,
        download_link: format!("https://dl.example.com/files/{}.bin", file_id),
        stream_links: None,
        user_id,
        upload_date: Utc::now(),
        download_count: 0,
    }
}

#[test]
fn test_add_user_is_idempotent() {
    let db = TestDb::new();
    let conn = db.conn();

    assert!(add_user(&conn, 7).unwrap());
    assert!(!add_user(&conn, 7).unwrap());
    assert!(is_user_exist(&conn, 7).unwrap());
    assert_eq!(total_users_count(&conn).unwrap(), 1);

    let user = get_user(&conn, 7).unwrap().unwrap();
    assert_eq!(user.file_count, 0);
    assert_eq!(user.join_date, user.last_active);
}

#[test]
fn test_delete_user_twice() {
    let db = TestDb::new();
    let conn = db.conn();
    add_user(&conn, 5).unwrap();

    delete_user(&conn, 5).unwrap();
    delete_user(&conn, 5).unwrap();

    assert!(!is_user_exist(&conn, 5).unwrap());
    // never existed
    delete_user(&conn, 999).unwrap();
}

#[test]
fn test_update_activity_moves_last_active() {
    let db = TestDb::new();
    let conn = db.conn();
    add_user(&conn, 3).unwrap();
    let before = get_user(&conn, 3).unwrap().unwrap();

    std::thread::sleep(std::time::Duration::from_millis(5));
    update_user_activity(&conn, 3).unwrap();

    let after = get_user(&conn, 3).unwrap().unwrap();
    assert!(after.last_active > before.last_active);
    assert_eq!(after.join_date, before.join_date);

    // unknown users are not created
    update_user_activity(&conn, 4).unwrap();
    assert!(!is_user_exist(&conn, 4).unwrap());
}

#[test]
fn test_file_record_roundtrip_and_counts() {
    let db = TestDb::new();
    let conn = db.conn();
    add_user(&conn, 1).unwrap();

    let mut streamed = record("vid", 1);
    streamed.stream_links = Some(BTreeMap::from([
        (LinkKind::Direct, "https://dl.example.com/download/vid".to_string()),
        (LinkKind::Stream, "https://dl.example.com/stream/vid".to_string()),
    ]));
    add_file_record(&conn, &streamed).unwrap();
    add_file_record(&conn, &record("doc", 1)).unwrap();

    let stored = get_file(&conn, "vid").unwrap().unwrap();
    assert_eq!(stored.stream_links, streamed.stream_links);
    assert_eq!(stored.file_size, 42);
    assert!(get_file(&conn, "doc").unwrap().unwrap().stream_links.is_none());
    assert!(get_file(&conn, "missing").unwrap().is_none());

    assert_eq!(count_files(&conn).unwrap(), 2);
    assert_eq!(get_user(&conn, 1).unwrap().unwrap().file_count, 2);
}

#[test]
fn test_download_count() {
    let db = TestDb::new();
    let conn = db.conn();
    add_user(&conn, 1).unwrap();
    add_file_record(&conn, &record("a", 1)).unwrap();

    assert!(increment_download_count(&conn, "a").unwrap());
    assert!(increment_download_count(&conn, "a").unwrap());
    assert!(!increment_download_count(&conn, "nope").unwrap());
    assert_eq!(get_file(&conn, "a").unwrap().unwrap().download_count, 2);

    // re-upload keeps the counter
    add_file_record(&conn, &record("a", 1)).unwrap();
    assert_eq!(get_file(&conn, "a").unwrap().unwrap().download_count, 2);
    assert_eq!(count_files(&conn).unwrap(), 1);
}

#[test]
fn test_user_files_newest_first_and_limited() {
    let db = TestDb::new();
    let conn = db.conn();
    add_user(&conn, 1).unwrap();
    add_user(&conn, 2).unwrap();

    let now = Utc::now();
    for i in 0..(USER_FILES_LIMIT as i64 + 5) {
        let mut r = record(&format!("f{}", i), 1);
        r.upload_date = now - Duration::minutes(100 - i);
        add_file_record(&conn, &r).unwrap();
    }
    add_file_record(&conn, &record("other", 2)).unwrap();

    let files = get_user_files(&conn, 1, USER_FILES_LIMIT).unwrap();
    assert_eq!(files.len(), USER_FILES_LIMIT);
    assert_eq!(files[0].file_id, format!("f{}", USER_FILES_LIMIT + 4));
    assert!(files.windows(2).all(|w| w[0].upload_date >= w[1].upload_date));
    assert!(files.iter().all(|f| f.user_id == 1));
}

#[test]
fn test_stream_records() {
    let db = TestDb::new();
    let conn = db.conn();

    add_stream_record(&conn, "vid", "https://dl.example.com/stream/vid", "original").unwrap();
    assert_eq!(increment_stream_views(&conn, "vid").unwrap(), 1);
    assert_eq!(increment_stream_views(&conn, "vid").unwrap(), 1);
    assert_eq!(increment_stream_views(&conn, "nope").unwrap(), 0);

    let streams = get_streams_for_file(&conn, "vid").unwrap();
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].view_count, 2);
    assert_eq!(streams[0].quality, "original");
}

#[test]
fn test_stream_record_is_unique_per_quality() {
    let db = TestDb::new();
    let conn = db.conn();

    let first = add_stream_record(&conn, "vid", "https://old.example.com/stream/vid", "original").unwrap();
    increment_stream_views(&conn, "vid").unwrap();
    let second = add_stream_record(&conn, "vid", "https://dl.example.com/stream/vid", "original").unwrap();
    assert_eq!(first, second);

    let other = add_stream_record(&conn, "vid", "https://dl.example.com/stream/vid?q=480", "480p").unwrap();
    assert_ne!(other, first);

    let streams = get_streams_for_file(&conn, "vid").unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].stream_url, "https://dl.example.com/stream/vid");
    assert_eq!(streams[0].view_count, 1);
    assert_eq!(streams[1].quality, "480p");
}

#[tokio::test]
async fn test_sqlite_user_directory() {
    let db = TestDb::new();
    {
        let conn = db.conn();
        for id in [30, 10, 20] {
            add_user(&conn, id).unwrap();
        }
    }
    let directory = SqliteUserDirectory::new(Arc::clone(&db.pool));

    let mut ids = directory.list_all_user_ids().await.unwrap();
    ids.sort_unstable();
    assert_eq!(ids, vec![10, 20, 30]);
    assert_eq!(directory.count().await.unwrap(), 3);

    directory.delete_user(20).await.unwrap();
    directory.delete_user(20).await.unwrap();
    assert_eq!(get_all_users(&db.conn()).unwrap(), vec![10, 30]);
}

#[test]
fn test_migrations_are_reentrant() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twice.sqlite");
    let path = path.to_str().unwrap();

    let first = filelink::create_pool(path).unwrap();
    add_user(&first.get().unwrap(), 1).unwrap();
    drop(first);

    let second = filelink::create_pool(path).unwrap();
    assert!(is_user_exist(&second.get().unwrap(), 1).unwrap());
}
