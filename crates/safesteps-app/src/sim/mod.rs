//! In-process adapters standing in for a real device.
//!
//! Latencies are configurable so tests can run with zero delay while the
//! shell keeps the pauses a user would notice.

mod auth;
mod geolocation;
mod memory;
mod speech;

use std::{
  marker::PhantomData,
  sync::{Mutex, MutexGuard, PoisonError},
};

use safesteps_core::storage::KeyValueStore;

pub use auth::SimulatedAuth;
pub use geolocation::{Permission, SimulatedGeolocation};
pub use memory::MemoryStorage;
pub use speech::{SimulatedRecognizer, SpeechLog};

use crate::Platform;

/// Platform made of the simulated adapters over storage `K`.
pub struct Simulated<K>(PhantomData<K>);

impl<K: KeyValueStore> Platform for Simulated<K> {
  type Storage = K;
  type Geolocation = SimulatedGeolocation;
  type Auth = SimulatedAuth;
  type Recognizer = SimulatedRecognizer;
  type Speech = SpeechLog;
}

/// Lock a mutex, recovering the data if a holder panicked.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> { m.lock().unwrap_or_else(PoisonError::into_inner) }
