//! The geolocation capability: one-shot reads and continuous watches.

use std::{fmt, future::Future, time::Duration};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::position::Position;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failure kinds reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
  #[error("permission denied")]
  PermissionDenied,
  #[error("position unavailable")]
  PositionUnavailable,
  #[error("timed out")]
  Timeout,
  /// The device has no geolocation capability at all.
  #[error("geolocation unsupported")]
  Unsupported,
}

impl GeoError {
  /// User-facing message for a failed one-shot read.
  pub fn locate_message(self) -> &'static str {
    match self {
      Self::PermissionDenied => "Permissão negada. Por favor, permita o acesso à localização.",
      Self::PositionUnavailable => "Localização indisponível.",
      Self::Timeout => "Tempo esgotado ao obter localização.",
      Self::Unsupported => "Geolocalização não é suportada pelo seu navegador",
    }
  }

  /// User-facing message for an error reported while watching.
  pub fn tracking_message(self) -> &'static str {
    match self {
      Self::PermissionDenied => "Permissão negada.",
      Self::PositionUnavailable => "Localização indisponível.",
      Self::Timeout => "Tempo esgotado.",
      Self::Unsupported => "Geolocalização não é suportada pelo seu navegador",
    }
  }
}

// ─── Options ─────────────────────────────────────────────────────────────────

/// Options passed to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
  pub high_accuracy: bool,
  pub timeout:       Duration,
  /// Oldest cached reading the device may return; zero forces a fresh one.
  pub maximum_age:   Duration,
}

impl Default for PositionOptions {
  fn default() -> Self {
    Self {
      high_accuracy: true,
      timeout:       Duration::from_millis(10_000),
      maximum_age:   Duration::ZERO,
    }
  }
}

// ─── Watches ─────────────────────────────────────────────────────────────────

/// Handle identifying one continuous subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(pub u64);

impl fmt::Display for WatchId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "watch#{}", self.0) }
}

/// One callback from a watch: either a fresh reading or an error.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEvent {
  pub id:      WatchId,
  pub reading: Result<Position, GeoError>,
}

/// Where a provider delivers watch callbacks.
pub type WatchSink = mpsc::UnboundedSender<WatchEvent>;

/// Receiving half handed to the event loop.
pub type WatchEvents = mpsc::UnboundedReceiver<WatchEvent>;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The device's geolocation capability.
pub trait GeolocationProvider: Send + Sync {
  /// Resolve one reading.
  fn current_position(
    &self,
    options: PositionOptions,
  ) -> impl Future<Output = Result<Position, GeoError>> + Send + '_;

  /// Start a continuous subscription that sends every reading to `sink`
  /// tagged with the returned id, until [`clear_watch`](Self::clear_watch).
  fn watch_position(
    &self,
    options: PositionOptions,
    sink: WatchSink,
  ) -> Result<WatchId, GeoError>;

  /// Release the subscription. Clearing an unknown id does nothing.
  fn clear_watch(&self, id: WatchId);
}
