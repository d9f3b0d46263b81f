//! Occurrences: user reports of unsafe-area incidents.
//!
//! Occurrences are created from an [`OccurrenceForm`] and never mutated
//! afterwards.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::ValidationError;

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The fixed enumeration of incident kinds offered by the form.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OccurrenceKind {
  NoLighting,
  LowTraffic,
  Harassment,
  RiskArea,
  Other,
}

impl OccurrenceKind {
  /// The human label stored in [`Occurrence::kind`].
  pub fn label(self) -> &'static str {
    match self {
      Self::NoLighting => "Ausência de Iluminação",
      Self::LowTraffic => "Rua Pouco Movimentada",
      Self::Harassment => "Assédio Costumeiro",
      Self::RiskArea => "Área de Risco",
      Self::Other => "Outros",
    }
  }
}

// ─── Form ────────────────────────────────────────────────────────────────────

/// Raw form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceForm {
  pub kind:        Option<OccurrenceKind>,
  /// Only consulted when `kind` is [`OccurrenceKind::Other`].
  pub custom_type: String,
  pub address:     String,
  /// `YYYY-MM-DD`.
  pub date:        String,
  /// `HH:MM`.
  pub time:        String,
}

/// A form that passed every rule, ready to be stamped with an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOccurrence {
  pub kind:        String,
  pub custom_type: Option<String>,
  pub address:     String,
  pub date:        String,
  pub time:        String,
}

impl OccurrenceForm {
  /// Check the rules in order and report the first failure.
  ///
  /// Order: kind selected, custom text when kind is "other", address, date
  /// present, time present. Date and time are then parsed, and the date must
  /// not be after `today`.
  pub fn validate(&self, today: NaiveDate) -> Result<ValidOccurrence, ValidationError> {
    let kind = self.kind.ok_or(ValidationError::MissingOccurrenceType)?;
    let custom = self.custom_type.trim();
    if kind == OccurrenceKind::Other && custom.is_empty() {
      return Err(ValidationError::MissingCustomType);
    }
    if self.address.trim().is_empty() {
      return Err(ValidationError::MissingAddress);
    }
    if self.date.trim().is_empty() {
      return Err(ValidationError::MissingDate);
    }
    if self.time.trim().is_empty() {
      return Err(ValidationError::MissingTime);
    }

    let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
      .map_err(|_| ValidationError::InvalidDate(self.date.clone()))?;
    if date > today {
      return Err(ValidationError::FutureDate);
    }
    NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
      .map_err(|_| ValidationError::InvalidTime(self.time.clone()))?;

    let (label, custom_type) = match kind {
      OccurrenceKind::Other => (custom.to_string(), Some(custom.to_string())),
      k => (k.label().to_string(), None),
    };

    Ok(ValidOccurrence {
      kind: label,
      custom_type,
      address: self.address.clone(),
      date: self.date.trim().to_string(),
      time: self.time.trim().to_string(),
    })
  }
}

// ─── Occurrence ──────────────────────────────────────────────────────────────

/// A persisted incident report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
  pub id:          String,
  /// Label of the chosen kind, or the free text when the kind was "other".
  #[serde(rename = "type")]
  pub kind:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom_type: Option<String>,
  pub address:     String,
  pub date:        String,
  pub time:        String,
  /// Submission time, epoch milliseconds.
  pub timestamp:   i64,
}

impl Occurrence {
  pub fn from_valid(id: String, timestamp: i64, valid: ValidOccurrence) -> Self {
    Self {
      id,
      kind: valid.kind,
      custom_type: valid.custom_type,
      address: valid.address,
      date: valid.date,
      time: valid.time,
      timestamp,
    }
  }

  /// `DD/MM/YYYY` rendering of the stored ISO date.
  pub fn display_date(&self) -> String {
    match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
      Ok(d) => d.format("%d/%m/%Y").to_string(),
      Err(_) => self.date.clone(),
    }
  }

  /// The last six characters of the id, used as a short reference.
  pub fn short_id(&self) -> &str {
    let start = self.id.len().saturating_sub(6);
    self.id.get(start..).unwrap_or(&self.id)
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 10).unwrap() }

  fn filled() -> OccurrenceForm {
    OccurrenceForm {
      kind:        Some(OccurrenceKind::Harassment),
      custom_type: String::new(),
      address:     "Rua Augusta, 100".into(),
      date:        "2024-05-09".into(),
      time:        "22:15".into(),
    }
  }

  #[test]
  fn missing_kind_is_reported_first() {
    let err = OccurrenceForm::default().validate(today()).unwrap_err();
    assert_eq!(err, ValidationError::MissingOccurrenceType);
  }

  #[test]
  fn other_requires_custom_text() {
    let form = OccurrenceForm { kind: Some(OccurrenceKind::Other), ..filled() };
    assert_eq!(form.validate(today()).unwrap_err(), ValidationError::MissingCustomType);
  }

  #[test]
  fn rules_apply_in_order() {
    let mut form = filled();
    form.address = " ".into();
    form.date.clear();
    assert_eq!(form.validate(today()).unwrap_err(), ValidationError::MissingAddress);

    form.address = "Av. Paulista".into();
    assert_eq!(form.validate(today()).unwrap_err(), ValidationError::MissingDate);

    form.date = "2024-05-01".into();
    form.time.clear();
    assert_eq!(form.validate(today()).unwrap_err(), ValidationError::MissingTime);
  }

  #[test]
  fn future_date_is_rejected() {
    let form = OccurrenceForm { date: "2024-05-11".into(), ..filled() };
    assert_eq!(form.validate(today()).unwrap_err(), ValidationError::FutureDate);
  }

  #[test]
  fn today_is_accepted() {
    let form = OccurrenceForm { date: "2024-05-10".into(), ..filled() };
    assert!(form.validate(today()).is_ok());
  }

  #[test]
  fn malformed_time_is_rejected() {
    let form = OccurrenceForm { time: "25:99".into(), ..filled() };
    assert!(matches!(
      form.validate(today()).unwrap_err(),
      ValidationError::InvalidTime(_)
    ));
  }

  #[test]
  fn valid_form_uses_label_or_custom_text() {
    let valid = filled().validate(today()).unwrap();
    assert_eq!(valid.kind, "Assédio Costumeiro");
    assert_eq!(valid.custom_type, None);

    let other = OccurrenceForm {
      kind: Some(OccurrenceKind::Other),
      custom_type: "  Buraco na calçada ".into(),
      ..filled()
    };
    let valid = other.validate(today()).unwrap();
    assert_eq!(valid.kind, "Buraco na calçada");
    assert_eq!(valid.custom_type.as_deref(), Some("Buraco na calçada"));
  }

  #[test]
  fn kind_parses_from_form_value() {
    assert_eq!(OccurrenceKind::from_str("risk-area").unwrap(), OccurrenceKind::RiskArea);
    assert_eq!(OccurrenceKind::NoLighting.to_string(), "no-lighting");
  }

  #[test]
  fn serialized_shape_uses_type_key() {
    let occ = Occurrence::from_valid("1715300000000".into(), 1, filled().validate(today()).unwrap());
    let json = serde_json::to_value(&occ).unwrap();
    assert_eq!(json["type"], "Assédio Costumeiro");
    assert!(json.get("customType").is_none());
    assert_eq!(occ.short_id(), "000000");
    assert_eq!(occ.display_date(), "09/05/2024");
  }
}
