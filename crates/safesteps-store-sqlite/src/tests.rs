//! Integration tests for `SqliteStorage` against in-memory and on-disk
//! databases.

use safesteps_core::{
  location::SavedLocation,
  position::Position,
  storage::{KeyValueStore, decode_json, encode_json, keys},
};

use crate::SqliteStorage;

async fn store() -> SqliteStorage {
  SqliteStorage::open_in_memory()
    .await
    .expect("in-memory store")
}

#[tokio::test]
async fn get_missing_key_returns_none() {
  let s = store().await;
  assert_eq!(s.get("nope").await.unwrap(), None);
}

#[tokio::test]
async fn set_then_get() {
  let s = store().await;
  s.set(keys::USER_EMAIL, "ana@example.com".into()).await.unwrap();
  assert_eq!(
    s.get(keys::USER_EMAIL).await.unwrap().as_deref(),
    Some("ana@example.com")
  );
}

#[tokio::test]
async fn set_overwrites_last_write_wins() {
  let s = store().await;
  s.set(keys::USER_LANGUAGE, "pt".into()).await.unwrap();
  s.set(keys::USER_LANGUAGE, "en".into()).await.unwrap();
  assert_eq!(s.get(keys::USER_LANGUAGE).await.unwrap().as_deref(), Some("en"));
  assert_eq!(s.keys().await.unwrap(), vec![keys::USER_LANGUAGE.to_string()]);
}

#[tokio::test]
async fn remove_is_idempotent() {
  let s = store().await;
  s.set(keys::TERMS_ACCEPTED, "true".into()).await.unwrap();
  s.remove(keys::TERMS_ACCEPTED).await.unwrap();
  s.remove(keys::TERMS_ACCEPTED).await.unwrap();
  assert_eq!(s.get(keys::TERMS_ACCEPTED).await.unwrap(), None);
}

#[tokio::test]
async fn collection_round_trips_through_json() {
  let s = store().await;
  let pos = Position::new(-23.5, -46.6, 1000);
  let saved = vec![
    SavedLocation::snapshot("1000".into(), "Casa", Some(&pos)).unwrap(),
    SavedLocation::snapshot("1001".into(), "Trabalho", Some(&pos)).unwrap(),
  ];

  s.set(keys::SAVED_LOCATIONS, encode_json(&saved).unwrap())
    .await
    .unwrap();
  let raw = s.get(keys::SAVED_LOCATIONS).await.unwrap().unwrap();
  let loaded: Vec<SavedLocation> = decode_json(keys::SAVED_LOCATIONS, &raw).unwrap();
  assert_eq!(loaded, saved);
}

#[tokio::test]
async fn data_survives_reopen() {
  let dir = std::env::temp_dir().join(format!("safesteps-test-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("store.sqlite");
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteStorage::open(&path).await.unwrap();
    s.set(keys::TERMS_ACCEPTED, "true".into()).await.unwrap();
  }

  let reopened = SqliteStorage::open(&path).await.unwrap();
  assert_eq!(
    reopened.get(keys::TERMS_ACCEPTED).await.unwrap().as_deref(),
    Some("true")
  );

  drop(reopened);
  let _ = std::fs::remove_dir_all(&dir);
}
