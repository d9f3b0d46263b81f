//! Wall-clock access, injectable so ids, timestamps and "today" are
//! deterministic under test.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  /// Milliseconds since the Unix epoch.
  fn now_millis(&self) -> i64 { self.now().timestamp_millis() }

  /// The current calendar date in UTC.
  fn today(&self) -> NaiveDate { self.now().date_naive() }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
  /// Freeze the clock at `millis` since the Unix epoch.
  pub fn at_millis(millis: i64) -> Self {
    Self(DateTime::from_timestamp_millis(millis).unwrap_or_default())
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}

/// Derive an id from `millis` that does not collide with any of `taken`.
///
/// Ids are decimal epoch-ms strings; on collision the value is bumped by one
/// millisecond until free.
pub fn unique_millis_id<'a>(
  millis: i64,
  taken: impl Iterator<Item = &'a str> + Clone,
) -> String {
  let mut candidate = millis;
  loop {
    let id = candidate.to_string();
    if !taken.clone().any(|t| t == id) {
      return id;
    }
    candidate += 1;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unique_id_uses_millis_when_free() {
    let taken: Vec<String> = vec![];
    let id = unique_millis_id(1_000, taken.iter().map(String::as_str));
    assert_eq!(id, "1000");
  }

  #[test]
  fn unique_id_bumps_past_collisions() {
    let taken = ["1000".to_string(), "1001".to_string()];
    let id = unique_millis_id(1_000, taken.iter().map(String::as_str));
    assert_eq!(id, "1002");
  }

  #[test]
  fn fixed_clock_reports_its_instant() {
    let clock = FixedClock::at_millis(86_400_000);
    assert_eq!(clock.now_millis(), 86_400_000);
    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
  }
}
