use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Arc, Mutex},
};

use safesteps_core::storage::KeyValueStore;

use super::lock;

/// Volatile key/value storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
  pub fn len(&self) -> usize { lock(&self.map).len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl KeyValueStore for MemoryStorage {
  type Error = Infallible;

  async fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(lock(&self.map).get(key).cloned())
  }

  async fn set(&self, key: &str, value: String) -> Result<(), Infallible> {
    lock(&self.map).insert(key.to_string(), value);
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), Infallible> {
    lock(&self.map).remove(key);
    Ok(())
  }
}
