//! One geolocation reading.
//!
//! A position is immutable once captured. Each new reading supersedes the
//! previous one; readings are never merged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single reading from the geolocation capability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub latitude:  f64,
  pub longitude: f64,
  /// Horizontal accuracy radius in metres.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub accuracy:  Option<f64>,
  #[serde(default)]
  pub altitude:  Option<f64>,
  /// Ground speed in metres per second.
  #[serde(default)]
  pub speed:     Option<f64>,
  /// Capture time, epoch milliseconds.
  pub timestamp: i64,
}

impl Position {
  /// A bare reading with only coordinates and a capture time.
  pub fn new(latitude: f64, longitude: f64, timestamp: i64) -> Self {
    Self {
      latitude,
      longitude,
      accuracy: None,
      altitude: None,
      speed: None,
      timestamp,
    }
  }

  pub fn with_accuracy(mut self, accuracy: f64) -> Self {
    self.accuracy = Some(accuracy);
    self
  }

  /// Coordinates at display precision, e.g. `-23.550520, -46.633308`.
  pub fn coordinates(&self) -> String {
    format!("{:.6}, {:.6}", self.latitude, self.longitude)
  }

  /// Speed in km/h with one decimal, or `N/A` when the device gave none.
  pub fn speed_kmh(&self) -> String {
    match self.speed {
      Some(mps) => format!("{:.1} km/h", mps * 3.6),
      None => "N/A".to_string(),
    }
  }

  pub fn captured_at(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(self.timestamp)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn coordinates_use_six_decimals() {
    let p = Position::new(-23.5, -46.6, 1000);
    assert_eq!(p.coordinates(), "-23.500000, -46.600000");
  }

  #[test]
  fn speed_is_converted_to_kmh() {
    let mut p = Position::new(0.0, 0.0, 0);
    assert_eq!(p.speed_kmh(), "N/A");
    p.speed = Some(10.0);
    assert_eq!(p.speed_kmh(), "36.0 km/h");
  }

  #[test]
  fn missing_optional_fields_deserialize_as_none() {
    let p: Position =
      serde_json::from_str(r#"{"latitude":1.0,"longitude":2.0,"timestamp":5}"#)
        .unwrap();
    assert_eq!(p, Position::new(1.0, 2.0, 5));
  }
}
