//! User-named snapshots of a captured [`Position`].
//!
//! A saved location copies the coordinates and capture time at save time;
//! it holds no link back to the live position.

use serde::{Deserialize, Serialize};

use crate::{ValidationError, position::Position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
  /// Unique within the collection; derived from the save time.
  pub id:        String,
  pub name:      String,
  pub latitude:  f64,
  pub longitude: f64,
  /// Capture time of the snapshotted position, epoch milliseconds.
  pub timestamp: i64,
}

impl SavedLocation {
  /// Validate `name` and `position` and build the snapshot.
  ///
  /// The position is checked first so that saving with nothing captured
  /// reports the missing position rather than the name.
  pub fn snapshot(
    id: String,
    name: &str,
    position: Option<&Position>,
  ) -> Result<Self, ValidationError> {
    let position = position.ok_or(ValidationError::NoPosition)?;
    if name.trim().is_empty() {
      return Err(ValidationError::EmptyLocationName);
    }
    Ok(Self {
      id,
      name: name.to_string(),
      latitude: position.latitude,
      longitude: position.longitude,
      timestamp: position.timestamp,
    })
  }

  /// Rehydrate a position from this snapshot. Only coordinates and capture
  /// time survive; accuracy, altitude and speed are absent.
  pub fn to_position(&self) -> Position {
    Position::new(self.latitude, self.longitude, self.timestamp)
  }
}
