use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
  },
  time::Duration,
};

use safesteps_core::{
  clock::Clock,
  geolocation::{
    GeoError, GeolocationProvider, PositionOptions, WatchEvent, WatchId, WatchSink,
  },
  position::Position,
};
use tokio::task::JoinHandle;

use super::lock;

/// Whether the simulated user granted location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
  #[default]
  Granted,
  Denied,
}

/// A device that reports positions circling slowly around a fixed origin.
///
/// Each watch runs as its own task; [`clear_watch`](GeolocationProvider::clear_watch)
/// aborts it so nothing more is sent for that id.
pub struct SimulatedGeolocation {
  origin:     Position,
  latency:    Duration,
  interval:   Duration,
  permission: Permission,
  clock:      Arc<dyn Clock>,
  next_id:    AtomicU64,
  watches:    Mutex<HashMap<WatchId, JoinHandle<()>>>,
}

impl SimulatedGeolocation {
  pub fn new(origin: Position, clock: Arc<dyn Clock>) -> Self {
    Self {
      origin,
      latency: Duration::ZERO,
      interval: Duration::from_secs(1),
      permission: Permission::Granted,
      clock,
      next_id: AtomicU64::new(1),
      watches: Mutex::new(HashMap::new()),
    }
  }

  /// Delay before a one-shot read resolves.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  /// Time between watch readings.
  pub fn with_interval(mut self, interval: Duration) -> Self {
    self.interval = interval;
    self
  }

  pub fn with_permission(mut self, permission: Permission) -> Self {
    self.permission = permission;
    self
  }

  /// Number of watches still running.
  pub fn active_watches(&self) -> usize { lock(&self.watches).len() }
}

/// The `step`-th reading of a walk around `origin`.
fn reading(origin: &Position, step: u64, timestamp: i64) -> Position {
  let angle = step as f64 * 0.5;
  Position {
    latitude: origin.latitude + 0.0001 * angle.sin(),
    longitude: origin.longitude + 0.0001 * (angle.cos() - 1.0),
    accuracy: origin.accuracy,
    altitude: origin.altitude,
    speed: (step > 0).then_some(1.4),
    timestamp,
  }
}

impl GeolocationProvider for SimulatedGeolocation {
  async fn current_position(&self, options: PositionOptions) -> Result<Position, GeoError> {
    if self.latency > options.timeout {
      tokio::time::sleep(options.timeout).await;
      return Err(GeoError::Timeout);
    }
    tokio::time::sleep(self.latency).await;
    match self.permission {
      Permission::Denied => Err(GeoError::PermissionDenied),
      Permission::Granted => Ok(reading(&self.origin, 0, self.clock.now_millis())),
    }
  }

  fn watch_position(
    &self,
    _options: PositionOptions,
    sink: WatchSink,
  ) -> Result<WatchId, GeoError> {
    let id = WatchId(self.next_id.fetch_add(1, Ordering::Relaxed));
    let origin = self.origin;
    let interval = self.interval;
    let permission = self.permission;
    let clock = self.clock.clone();

    let task = tokio::spawn(async move {
      if permission == Permission::Denied {
        let _ = sink.send(WatchEvent { id, reading: Err(GeoError::PermissionDenied) });
        return;
      }
      let mut step = 0;
      loop {
        let event = WatchEvent { id, reading: Ok(reading(&origin, step, clock.now_millis())) };
        if sink.send(event).is_err() {
          break;
        }
        step += 1;
        tokio::time::sleep(interval).await;
      }
    });

    lock(&self.watches).insert(id, task);
    tracing::debug!(%id, "simulated watch started");
    Ok(id)
  }

  fn clear_watch(&self, id: WatchId) {
    if let Some(task) = lock(&self.watches).remove(&id) {
      task.abort();
      tracing::debug!(%id, "simulated watch cleared");
    }
  }
}

impl Drop for SimulatedGeolocation {
  fn drop(&mut self) {
    for (_, task) in lock(&self.watches).drain() {
      task.abort();
    }
  }
}

#[cfg(test)]
mod tests {
  use safesteps_core::clock::FixedClock;
  use tokio::sync::mpsc;

  use super::*;

  fn device() -> SimulatedGeolocation {
    SimulatedGeolocation::new(
      Position::new(-23.55, -46.63, 0).with_accuracy(8.0),
      Arc::new(FixedClock::at_millis(42)),
    )
    .with_interval(Duration::from_millis(5))
  }

  #[tokio::test]
  async fn one_shot_returns_origin() {
    let p = device().current_position(PositionOptions::default()).await.unwrap();
    assert_eq!(p.latitude, -23.55);
    assert_eq!(p.longitude, -46.63);
    assert_eq!(p.accuracy, Some(8.0));
    assert_eq!(p.timestamp, 42);
  }

  #[tokio::test]
  async fn one_shot_honours_permission_and_timeout() {
    let denied = device().with_permission(Permission::Denied);
    assert_eq!(
      denied.current_position(PositionOptions::default()).await,
      Err(GeoError::PermissionDenied)
    );

    let slow = device().with_latency(Duration::from_millis(50));
    let options = PositionOptions { timeout: Duration::from_millis(1), ..Default::default() };
    assert_eq!(slow.current_position(options).await, Err(GeoError::Timeout));
  }

  #[tokio::test]
  async fn watch_streams_until_cleared() {
    let geo = device();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = geo.watch_position(PositionOptions::default(), tx).unwrap();

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.id, id);
    assert_eq!(second.id, id);
    assert!(first.reading.is_ok() && second.reading.is_ok());

    geo.clear_watch(id);
    assert_eq!(geo.active_watches(), 0);
    // The aborted task drops its sender, closing the channel once drained.
    while rx.recv().await.is_some() {}
  }

  #[tokio::test]
  async fn denied_watch_reports_error() {
    let geo = device().with_permission(Permission::Denied);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = geo.watch_position(PositionOptions::default(), tx).unwrap();
    let event = rx.recv().await.unwrap();
    assert_eq!(event, WatchEvent { id, reading: Err(GeoError::PermissionDenied) });
  }
}
