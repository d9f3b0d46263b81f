//! The [`KeyValueStore`] trait and the persisted key layout.
//!
//! Storage is a flat string-keyed map of strings. Collections are stored as
//! JSON arrays; scalar preferences as plain strings. There is no schema
//! versioning, so anything unreadable is treated as absent by the caller.

use std::future::Future;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Keys observed in durable storage.
pub mod keys {
  pub const SAVED_LOCATIONS: &str = "savedLocations";
  pub const OCCURRENCES: &str = "occurrences";
  pub const TERMS_ACCEPTED: &str = "termsAccepted";
  pub const USER_EMAIL: &str = "userEmail";
  pub const USER_PHOTO: &str = "userPhoto";
  pub const USER_GENDER: &str = "userGender";
  pub const USER_LANGUAGE: &str = "userLanguage";
  pub const HOME_ADDRESS: &str = "homeAddress";
  pub const APP_VOICE: &str = "appVoice";
  pub const VISUALLY_IMPAIRED: &str = "visuallyImpaired";
  pub const SHOW_POLICE_STATIONS: &str = "showPoliceStations";
}

/// Abstraction over durable local key/value storage.
///
/// Writes are complete when the returned future resolves; there is no
/// partial-write or rollback model and the last write wins.
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value under `key`, or `None` if never written.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Insert or overwrite the value under `key`.
  fn set<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete `key`. Removing an absent key is not an error.
  fn remove<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// Decode a JSON blob read from `key`.
pub fn decode_json<T: DeserializeOwned>(key: &'static str, raw: &str) -> Result<T> {
  serde_json::from_str(raw).map_err(|source| Error::StorageParse { key, source })
}

/// Encode a value for storage.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

/// Plain-string encoding used for boolean flags.
pub fn encode_flag(flag: bool) -> String { flag.to_string() }

pub fn decode_flag(raw: Option<&str>) -> bool { raw == Some("true") }
