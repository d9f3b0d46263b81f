//! Shared load/store helpers for JSON collections.

use safesteps_core::storage::{KeyValueStore, decode_json, encode_json};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Read the collection under `key`.
///
/// An absent key yields an empty collection. A malformed blob is logged and
/// also yields an empty collection; only storage I/O failures propagate.
pub async fn load_collection<K, T>(storage: &K, key: &'static str) -> Result<Vec<T>>
where
  K: KeyValueStore,
  T: DeserializeOwned,
{
  let Some(raw) = storage.get(key).await.map_err(Error::storage)? else {
    return Ok(Vec::new());
  };
  match decode_json(key, &raw) {
    Ok(items) => Ok(items),
    Err(e) => {
      tracing::warn!(error = %e, "discarding unreadable stored collection");
      Ok(Vec::new())
    }
  }
}

/// Overwrite the collection under `key` with `items`.
pub async fn store_collection<K, T>(storage: &K, key: &'static str, items: &[T]) -> Result<()>
where
  K: KeyValueStore,
  T: Serialize,
{
  let raw = encode_json(items)?;
  storage.set(key, raw).await.map_err(Error::storage)?;
  tracing::debug!(key, len = items.len(), "collection persisted");
  Ok(())
}
