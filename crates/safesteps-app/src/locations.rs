//! The user's named saved locations.

use std::sync::Arc;

use safesteps_core::{
  clock::{Clock, unique_millis_id},
  location::SavedLocation,
  position::Position,
  storage::{KeyValueStore, keys},
};

use crate::{
  Result,
  persist::{load_collection, store_collection},
};

/// Saved locations in insertion order, mirrored to durable storage after
/// every mutation.
pub struct LocationStore<K> {
  storage: Arc<K>,
  clock:   Arc<dyn Clock>,
  items:   Vec<SavedLocation>,
}

impl<K: KeyValueStore> LocationStore<K> {
  /// Load the persisted collection, preserving its stored order.
  pub async fn load(storage: Arc<K>, clock: Arc<dyn Clock>) -> Result<Self> {
    let items = load_collection(storage.as_ref(), keys::SAVED_LOCATIONS).await?;
    Ok(Self { storage, clock, items })
  }

  pub fn list(&self) -> &[SavedLocation] { &self.items }

  pub fn get(&self, id: &str) -> Option<&SavedLocation> {
    self.items.iter().find(|l| l.id == id)
  }

  /// Snapshot `position` under `name` and append it.
  ///
  /// Fails without touching the collection if the name is blank or there is
  /// no position.
  pub async fn save(&mut self, name: &str, position: Option<&Position>) -> Result<SavedLocation> {
    let id = unique_millis_id(
      self.clock.now_millis(),
      self.items.iter().map(|l| l.id.as_str()),
    );
    let saved = SavedLocation::snapshot(id, name, position)?;

    let mut next = self.items.clone();
    next.push(saved.clone());
    store_collection(self.storage.as_ref(), keys::SAVED_LOCATIONS, &next).await?;
    self.items = next;

    tracing::info!(id = %saved.id, name = %saved.name, "location saved");
    Ok(saved)
  }

  /// Remove the entry with `id`. Returns whether anything was removed; an
  /// unknown id is not an error and writes nothing.
  pub async fn delete(&mut self, id: &str) -> Result<bool> {
    if self.get(id).is_none() {
      tracing::debug!(id, "delete of unknown location ignored");
      return Ok(false);
    }

    let next: Vec<_> = self.items.iter().filter(|l| l.id != id).cloned().collect();
    store_collection(self.storage.as_ref(), keys::SAVED_LOCATIONS, &next).await?;
    self.items = next;

    tracing::info!(id, "location deleted");
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use safesteps_core::{ValidationError, clock::FixedClock, storage::KeyValueStore};

  use super::*;
  use crate::{Error, sim::MemoryStorage};

  async fn store_at(millis: i64) -> (LocationStore<MemoryStorage>, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::default());
    let clock = Arc::new(FixedClock::at_millis(millis));
    let store = LocationStore::load(storage.clone(), clock).await.unwrap();
    (store, storage)
  }

  #[tokio::test]
  async fn save_appends_snapshot() {
    let (mut store, _) = store_at(5_000).await;
    let pos = Position::new(-23.5, -46.6, 1000);

    let saved = store.save("Casa", Some(&pos)).await.unwrap();
    assert_eq!(store.list().len(), 1);
    assert_eq!(store.list()[0], saved);
    assert_eq!(saved.name, "Casa");
    assert_eq!((saved.latitude, saved.longitude, saved.timestamp), (-23.5, -46.6, 1000));
  }

  #[tokio::test]
  async fn ids_stay_unique_within_the_same_millisecond() {
    let (mut store, _) = store_at(5_000).await;
    let pos = Position::new(0.0, 0.0, 1);
    let a = store.save("A", Some(&pos)).await.unwrap();
    let b = store.save("B", Some(&pos)).await.unwrap();
    let c = store.save("C", Some(&pos)).await.unwrap();
    assert_eq!(store.list().len(), 3);
    assert_ne!(a.id, b.id);
    assert_ne!(b.id, c.id);
    assert_ne!(a.id, c.id);
    assert_eq!(
      store.list().iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
      ["A", "B", "C"]
    );
  }

  #[tokio::test]
  async fn blank_name_leaves_collection_unchanged() {
    let (mut store, storage) = store_at(1).await;
    let pos = Position::new(0.0, 0.0, 1);
    for name in ["", "   ", "\t\n"] {
      let err = store.save(name, Some(&pos)).await.unwrap_err();
      assert!(matches!(err, Error::Validation(ValidationError::EmptyLocationName)));
    }
    assert!(store.list().is_empty());
    assert_eq!(storage.get(keys::SAVED_LOCATIONS).await.unwrap(), None);
  }

  #[tokio::test]
  async fn delete_unknown_id_is_a_no_op() {
    let (mut store, _) = store_at(1).await;
    store.save("Casa", Some(&Position::new(1.0, 2.0, 3))).await.unwrap();
    assert!(!store.delete("does-not-exist").await.unwrap());
    assert_eq!(store.list().len(), 1);
  }

  #[tokio::test]
  async fn delete_removes_and_persists() {
    let (mut store, storage) = store_at(1).await;
    let saved = store.save("Casa", Some(&Position::new(1.0, 2.0, 3))).await.unwrap();
    assert!(store.delete(&saved.id).await.unwrap());
    assert!(store.list().is_empty());
    assert_eq!(
      storage.get(keys::SAVED_LOCATIONS).await.unwrap().as_deref(),
      Some("[]")
    );
  }

  #[tokio::test]
  async fn reload_preserves_order_and_content() {
    let (mut store, storage) = store_at(10).await;
    let pos = Position::new(-23.5, -46.6, 1000);
    store.save("Casa", Some(&pos)).await.unwrap();
    store.save("Trabalho", Some(&pos)).await.unwrap();

    let reloaded =
      LocationStore::load(storage, Arc::new(FixedClock::at_millis(10))).await.unwrap();
    assert_eq!(reloaded.list(), store.list());
  }

  #[tokio::test]
  async fn corrupt_blob_loads_as_empty() {
    let storage = Arc::new(MemoryStorage::default());
    storage.set(keys::SAVED_LOCATIONS, "[{broken".into()).await.unwrap();
    let store = LocationStore::load(storage, Arc::new(FixedClock::at_millis(0)))
      .await
      .unwrap();
    assert!(store.list().is_empty());
  }
}
