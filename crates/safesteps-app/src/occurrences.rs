//! Submitted incident reports, newest first.

use std::sync::Arc;

use safesteps_core::{
  clock::{Clock, unique_millis_id},
  occurrence::{Occurrence, OccurrenceForm},
  storage::{KeyValueStore, keys},
};

use crate::{
  Result,
  persist::{load_collection, store_collection},
};

pub struct OccurrenceStore<K> {
  storage: Arc<K>,
  clock:   Arc<dyn Clock>,
  items:   Vec<Occurrence>,
}

impl<K: KeyValueStore> OccurrenceStore<K> {
  pub async fn load(storage: Arc<K>, clock: Arc<dyn Clock>) -> Result<Self> {
    let items = load_collection(storage.as_ref(), keys::OCCURRENCES).await?;
    Ok(Self { storage, clock, items })
  }

  /// Most recent first.
  pub fn list(&self) -> &[Occurrence] { &self.items }

  /// Validate `form`, prepend the resulting occurrence and persist.
  ///
  /// The first failing rule aborts the submission before anything is
  /// written. The caller clears its form on success.
  pub async fn submit(&mut self, form: &OccurrenceForm) -> Result<Occurrence> {
    let valid = form.validate(self.clock.today())?;
    let now = self.clock.now_millis();
    let id = unique_millis_id(now, self.items.iter().map(|o| o.id.as_str()));
    let occurrence = Occurrence::from_valid(id, now, valid);

    let mut next = Vec::with_capacity(self.items.len() + 1);
    next.push(occurrence.clone());
    next.extend(self.items.iter().cloned());
    store_collection(self.storage.as_ref(), keys::OCCURRENCES, &next).await?;
    self.items = next;

    tracing::info!(id = %occurrence.id, kind = %occurrence.kind, "occurrence registered");
    Ok(occurrence)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use safesteps_core::{
    ValidationError,
    clock::FixedClock,
    occurrence::OccurrenceKind,
    storage::KeyValueStore,
  };

  use super::*;
  use crate::{Error, sim::MemoryStorage};

  fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()))
  }

  fn form(address: &str) -> OccurrenceForm {
    OccurrenceForm {
      kind:        Some(OccurrenceKind::NoLighting),
      custom_type: String::new(),
      address:     address.into(),
      date:        "2024-05-09".into(),
      time:        "21:30".into(),
    }
  }

  #[tokio::test]
  async fn submissions_are_prepended() {
    let storage = Arc::new(MemoryStorage::default());
    let mut store = OccurrenceStore::load(storage.clone(), clock()).await.unwrap();

    let first = store.submit(&form("Rua A")).await.unwrap();
    let second = store.submit(&form("Rua B")).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(
      store.list().iter().map(|o| o.address.as_str()).collect::<Vec<_>>(),
      ["Rua B", "Rua A"]
    );
    assert_eq!(first.kind, "Ausência de Iluminação");

    let reloaded = OccurrenceStore::load(storage, clock()).await.unwrap();
    assert_eq!(reloaded.list(), store.list());
  }

  #[tokio::test]
  async fn missing_type_wins_over_other_missing_fields() {
    let storage = Arc::new(MemoryStorage::default());
    let mut store = OccurrenceStore::load(storage.clone(), clock()).await.unwrap();

    let err = store.submit(&OccurrenceForm::default()).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::MissingOccurrenceType)));
    assert!(store.list().is_empty());
    assert_eq!(storage.get(keys::OCCURRENCES).await.unwrap(), None);
  }

  #[tokio::test]
  async fn future_dates_are_refused() {
    let storage = Arc::new(MemoryStorage::default());
    let mut store = OccurrenceStore::load(storage, clock()).await.unwrap();
    let mut f = form("Rua A");
    f.date = "2024-05-11".into();
    let err = store.submit(&f).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::FutureDate)));
  }
}
