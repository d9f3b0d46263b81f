//! The current position and the single active watch.
//!
//! The tracker never talks to the device itself. The app starts and clears
//! watches through the provider and feeds every callback through
//! [`Tracker::apply`], which drops callbacks from any watch other than the
//! active one.

use safesteps_core::{
  geolocation::{GeoError, WatchEvent, WatchId},
  position::Position,
};

#[derive(Debug, Default)]
pub struct Tracker {
  position: Option<Position>,
  error:    Option<&'static str>,
  loading:  bool,
  watch:    Option<WatchId>,
}

impl Tracker {
  pub fn position(&self) -> Option<&Position> { self.position.as_ref() }

  /// The user-visible error from the last failed read, if any.
  pub fn error(&self) -> Option<&'static str> { self.error }

  /// Whether a one-shot read is in flight.
  pub fn is_loading(&self) -> bool { self.loading }

  pub fn active_watch(&self) -> Option<WatchId> { self.watch }

  pub fn is_watching(&self) -> bool { self.watch.is_some() }

  pub fn dismiss_error(&mut self) { self.error = None; }

  // ── One-shot reads ────────────────────────────────────────────────────────

  pub fn begin_locate(&mut self) {
    self.loading = true;
    self.error = None;
  }

  /// Record the outcome of a one-shot read.
  pub fn finish_locate(&mut self, reading: Result<Position, GeoError>) -> Result<Position, GeoError> {
    self.loading = false;
    match reading {
      Ok(position) => {
        self.position = Some(position);
        Ok(position)
      }
      Err(e) => {
        self.error = Some(e.locate_message());
        Err(e)
      }
    }
  }

  // ── Watches ───────────────────────────────────────────────────────────────

  pub fn start_watch(&mut self, id: WatchId) {
    debug_assert!(self.watch.is_none(), "a watch is already active");
    self.watch = Some(id);
  }

  /// Forget the active watch and return it so the caller can release it.
  pub fn stop_watch(&mut self) -> Option<WatchId> { self.watch.take() }

  /// Apply one watch callback. Returns `false` if it came from a watch that
  /// is no longer active.
  pub fn apply(&mut self, event: WatchEvent) -> bool {
    if self.watch != Some(event.id) {
      tracing::debug!(id = %event.id, "dropping reading from inactive watch");
      return false;
    }
    match event.reading {
      Ok(position) => {
        self.position = Some(position);
        self.error = None;
      }
      Err(e) => {
        tracing::warn!(id = %event.id, error = %e, "watch reported an error");
        self.error = Some(e.tracking_message());
      }
    }
    true
  }

  /// Show `position` as current without any device involvement.
  pub fn show(&mut self, position: Position) { self.position = Some(position); }
}
