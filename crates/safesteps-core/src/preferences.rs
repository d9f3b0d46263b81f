//! Session preferences persisted across runs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::ValidationError;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  #[default]
  Other,
}

/// Interface languages offered at registration, keyed by ISO 639-1 code.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
  #[default]
  Pt,
  En,
  De,
  Es,
  Fr,
  It,
  Ja,
  Zh,
  Ko,
  Ru,
  Ar,
  Hi,
  Nl,
  Sv,
  No,
  Da,
  Fi,
  Pl,
  Tr,
  El,
  He,
  Th,
  Vi,
  Id,
}

impl Language {
  /// The subset the settings screen lets the user switch between.
  pub const SETTINGS: [Language; 5] =
    [Language::Pt, Language::En, Language::De, Language::Es, Language::Fr];

  /// The three languages shown before "more languages" at registration.
  pub const COMMON: [Language; 3] = [Language::Pt, Language::En, Language::De];

  pub fn all() -> impl Iterator<Item = Language> { Language::iter() }

  /// Accept only languages available on the settings screen.
  pub fn parse_setting(code: &str) -> Result<Self, ValidationError> {
    code
      .parse::<Language>()
      .ok()
      .filter(|l| Self::SETTINGS.contains(l))
      .ok_or_else(|| ValidationError::UnsupportedLanguage(code.to_string()))
  }
}

/// Assistant voices selectable on the settings screen.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
pub enum Voice {
  #[default]
  #[strum(serialize = "female-1")]
  #[serde(rename = "female-1")]
  Female1,
  #[strum(serialize = "female-2")]
  #[serde(rename = "female-2")]
  Female2,
  #[strum(serialize = "male-1")]
  #[serde(rename = "male-1")]
  Male1,
  #[strum(serialize = "male-2")]
  #[serde(rename = "male-2")]
  Male2,
}

impl Voice {
  pub fn label(self) -> &'static str {
    match self {
      Self::Female1 => "Voz Feminina 1",
      Self::Female2 => "Voz Feminina 2",
      Self::Male1 => "Voz Masculina 1",
      Self::Male2 => "Voz Masculina 2",
    }
  }
}

/// Everything the app remembers about the user between runs.
///
/// The authenticated flag is deliberately absent: a restart always lands on
/// the login screen once terms are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
  pub terms_accepted:       bool,
  pub email:                Option<String>,
  /// `data:` URL of the profile photo.
  pub photo:                Option<String>,
  pub gender:               Gender,
  pub language:             Language,
  pub home_address:         Option<String>,
  pub voice:                Voice,
  pub visually_impaired:    bool,
  pub show_police_stations: bool,
}

/// A password change request from the profile screen.
#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
  pub current: String,
  pub new:     String,
  pub confirm: String,
}

impl PasswordChange {
  /// All fields present, new matches confirmation, new is long enough.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.current.is_empty() || self.new.is_empty() || self.confirm.is_empty() {
      return Err(ValidationError::MissingPasswordFields);
    }
    if self.new != self.confirm {
      return Err(ValidationError::PasswordMismatch);
    }
    if self.new.chars().count() < crate::auth::MIN_PASSWORD_LEN {
      return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn settings_language_must_be_offered() {
    assert_eq!(Language::parse_setting("es").unwrap(), Language::Es);
    assert_eq!(
      Language::parse_setting("ja").unwrap_err(),
      ValidationError::UnsupportedLanguage("ja".into())
    );
    assert!(Language::parse_setting("xx").is_err());
  }

  #[test]
  fn registration_offers_every_language() {
    assert_eq!(Language::all().count(), 24);
    assert!(Language::COMMON.iter().all(|l| Language::SETTINGS.contains(l)));
  }

  #[test]
  fn voice_codes_round_trip_through_strum() {
    assert_eq!("male-2".parse::<Voice>().unwrap(), Voice::Male2);
    assert_eq!(Voice::Female1.to_string(), "female-1");
  }

  #[test]
  fn password_change_rules() {
    let mut change = PasswordChange {
      current: "old".into(),
      new:     "abc".into(),
      confirm: "abd".into(),
    };
    assert_eq!(change.validate().unwrap_err(), ValidationError::PasswordMismatch);
    change.confirm = "abc".into();
    assert_eq!(change.validate().unwrap_err(), ValidationError::PasswordTooShort);
    change.new = "abcdef".into();
    change.confirm = "abcdef".into();
    assert!(change.validate().is_ok());
    change.current.clear();
    assert_eq!(change.validate().unwrap_err(), ValidationError::MissingPasswordFields);
  }
}
