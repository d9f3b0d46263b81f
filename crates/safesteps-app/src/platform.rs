//! The set of adapters an [`App`](crate::App) runs against.

use std::sync::Arc;

use safesteps_core::{
  auth::Authenticator,
  clock::Clock,
  geolocation::GeolocationProvider,
  speech::{SpeechRecognizer, SpeechSink},
  storage::KeyValueStore,
};

/// Type-level bundle of the external capabilities.
pub trait Platform {
  type Storage: KeyValueStore;
  type Geolocation: GeolocationProvider;
  type Auth: Authenticator;
  type Recognizer: SpeechRecognizer;
  type Speech: SpeechSink;
}

/// Concrete adapter instances for a [`Platform`].
pub struct Adapters<P: Platform> {
  pub storage:     Arc<P::Storage>,
  pub geolocation: P::Geolocation,
  pub auth:        P::Auth,
  pub recognizer:  P::Recognizer,
  pub speech:      P::Speech,
  pub clock:       Arc<dyn Clock>,
  /// Locale passed to every utterance.
  pub locale:      String,
}
