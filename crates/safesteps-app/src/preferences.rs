//! Session preferences mirrored to plain-string storage keys.

use std::{str::FromStr, sync::Arc};

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use safesteps_core::{
  ValidationError,
  preferences::{Gender, Language, Preferences, Voice},
  storage::{KeyValueStore, decode_flag, encode_flag, keys},
};

use crate::{Error, Result};

/// Build a `data:` URL for an uploaded profile photo.
pub fn photo_data_url(media_type: &str, bytes: &[u8]) -> Result<String, ValidationError> {
  let media_type = media_type.trim().to_ascii_lowercase();
  if !media_type.starts_with("image/") || media_type.len() == "image/".len() {
    return Err(ValidationError::InvalidPhoto(media_type));
  }
  Ok(format!("data:{media_type};base64,{}", B64.encode(bytes)))
}

pub struct PreferenceStore<K> {
  storage: Arc<K>,
  prefs:   Preferences,
}

impl<K: KeyValueStore> PreferenceStore<K> {
  /// Read every preference once. Unknown enum values fall back to defaults.
  pub async fn load(storage: Arc<K>) -> Result<Self> {
    let s = storage.as_ref();
    let read = |key: &'static str| async move { s.get(key).await.map_err(Error::storage) };

    let prefs = Preferences {
      terms_accepted:       decode_flag(read(keys::TERMS_ACCEPTED).await?.as_deref()),
      email:                read(keys::USER_EMAIL).await?.filter(|v| !v.is_empty()),
      photo:                read(keys::USER_PHOTO).await?.filter(|v| !v.is_empty()),
      gender:               parse_or_default(keys::USER_GENDER, read(keys::USER_GENDER).await?),
      language:             parse_or_default(keys::USER_LANGUAGE, read(keys::USER_LANGUAGE).await?),
      home_address:         read(keys::HOME_ADDRESS).await?.filter(|v| !v.is_empty()),
      voice:                parse_or_default(keys::APP_VOICE, read(keys::APP_VOICE).await?),
      visually_impaired:    decode_flag(read(keys::VISUALLY_IMPAIRED).await?.as_deref()),
      show_police_stations: decode_flag(read(keys::SHOW_POLICE_STATIONS).await?.as_deref()),
    };

    Ok(Self { storage, prefs })
  }

  pub fn get(&self) -> &Preferences { &self.prefs }

  async fn write(&self, key: &'static str, value: String) -> Result<()> {
    self.storage.set(key, value).await.map_err(Error::storage)?;
    tracing::debug!(key, "preference persisted");
    Ok(())
  }

  pub async fn set_terms_accepted(&mut self, accepted: bool) -> Result<()> {
    self.write(keys::TERMS_ACCEPTED, encode_flag(accepted)).await?;
    self.prefs.terms_accepted = accepted;
    Ok(())
  }

  pub async fn set_email(&mut self, email: &str) -> Result<()> {
    self.write(keys::USER_EMAIL, email.to_string()).await?;
    self.prefs.email = Some(email.to_string());
    Ok(())
  }

  pub async fn set_photo(&mut self, data_url: String) -> Result<()> {
    self.write(keys::USER_PHOTO, data_url.clone()).await?;
    self.prefs.photo = Some(data_url);
    Ok(())
  }

  pub async fn set_gender(&mut self, gender: Gender) -> Result<()> {
    self.write(keys::USER_GENDER, gender.to_string()).await?;
    self.prefs.gender = gender;
    Ok(())
  }

  pub async fn set_language(&mut self, language: Language) -> Result<()> {
    self.write(keys::USER_LANGUAGE, language.to_string()).await?;
    self.prefs.language = language;
    Ok(())
  }

  pub async fn set_home_address(&mut self, address: &str) -> Result<()> {
    self.write(keys::HOME_ADDRESS, address.to_string()).await?;
    self.prefs.home_address = Some(address.to_string());
    Ok(())
  }

  pub async fn set_voice(&mut self, voice: Voice) -> Result<()> {
    self.write(keys::APP_VOICE, voice.to_string()).await?;
    self.prefs.voice = voice;
    Ok(())
  }

  pub async fn set_visually_impaired(&mut self, flag: bool) -> Result<()> {
    self.write(keys::VISUALLY_IMPAIRED, encode_flag(flag)).await?;
    self.prefs.visually_impaired = flag;
    Ok(())
  }

  pub async fn set_show_police_stations(&mut self, flag: bool) -> Result<()> {
    self.write(keys::SHOW_POLICE_STATIONS, encode_flag(flag)).await?;
    self.prefs.show_police_stations = flag;
    Ok(())
  }
}

fn parse_or_default<T: FromStr + Default>(key: &'static str, raw: Option<String>) -> T {
  match raw {
    None => T::default(),
    Some(raw) => raw.parse().unwrap_or_else(|_| {
      tracing::warn!(key, value = %raw, "ignoring unrecognised stored preference");
      T::default()
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sim::MemoryStorage;

  #[tokio::test]
  async fn empty_storage_yields_defaults() {
    let store = PreferenceStore::load(Arc::new(MemoryStorage::default())).await.unwrap();
    assert_eq!(store.get(), &Preferences::default());
  }

  #[tokio::test]
  async fn preferences_survive_reload() {
    let storage = Arc::new(MemoryStorage::default());
    let mut store = PreferenceStore::load(storage.clone()).await.unwrap();
    store.set_terms_accepted(true).await.unwrap();
    store.set_email("ana@example.com").await.unwrap();
    store.set_gender(Gender::Female).await.unwrap();
    store.set_language(Language::En).await.unwrap();
    store.set_voice(Voice::Male1).await.unwrap();
    store.set_visually_impaired(true).await.unwrap();
    store.set_show_police_stations(true).await.unwrap();

    let reloaded = PreferenceStore::load(storage.clone()).await.unwrap();
    assert_eq!(reloaded.get(), store.get());
    assert_eq!(
      storage.get(keys::TERMS_ACCEPTED).await.unwrap().as_deref(),
      Some("true")
    );
    assert_eq!(storage.get(keys::APP_VOICE).await.unwrap().as_deref(), Some("male-1"));
  }

  #[tokio::test]
  async fn unknown_gender_falls_back() {
    let storage = Arc::new(MemoryStorage::default());
    storage.set(keys::USER_GENDER, "robot".into()).await.unwrap();
    let store = PreferenceStore::load(storage).await.unwrap();
    assert_eq!(store.get().gender, Gender::Other);
  }

  #[test]
  fn photo_must_be_an_image() {
    let url = photo_data_url("image/png", b"\x89PNG").unwrap();
    assert_eq!(url, "data:image/png;base64,iVBORw==");
    assert!(matches!(
      photo_data_url("text/plain", b"hi"),
      Err(ValidationError::InvalidPhoto(_))
    ));
    assert!(photo_data_url("image/", b"").is_err());
  }
}
