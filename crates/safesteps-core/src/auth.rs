//! Authentication forms and the [`Authenticator`] trait.
//!
//! There is no real identity provider. The trait exists so the simulated
//! backend can be swapped for a real one without touching the app.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  ValidationError,
  preferences::{Gender, Language},
};

pub const MIN_PASSWORD_LEN: usize = 6;

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
  #[error("Credenciais inválidas")]
  Rejected,

  #[error("Biometria não reconhecida")]
  BiometricFailed,

  #[error("Serviço de autenticação indisponível: {0}")]
  Unavailable(String),
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

impl Credentials {
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.username.is_empty() || self.password.is_empty() {
      return Err(ValidationError::MissingCredentials);
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BiometricKind {
  Facial,
  Digital,
}

impl BiometricKind {
  /// Adjective used in notices ("Autenticação facial realizada!").
  pub fn describe(self) -> &'static str {
    match self {
      Self::Facial => "facial",
      Self::Digital => "por digital",
    }
  }
}

/// The sign-up form.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
  pub email:            String,
  pub password:         String,
  pub confirm_password: String,
  pub gender:           Option<Gender>,
  pub language:         Option<Language>,
  /// Biometric method enrolled during sign-up, if any.
  pub biometric:        Option<BiometricKind>,
  pub home_address:     Option<String>,
  pub accepted_terms:   bool,
}

/// A registration form that passed validation.
#[derive(Debug, Clone)]
pub struct Registration {
  pub email:        String,
  pub password:     String,
  pub gender:       Gender,
  pub language:     Language,
  pub biometric:    Option<BiometricKind>,
  pub home_address: Option<String>,
}

impl RegistrationForm {
  /// Check the rules in order and report the first failure.
  pub fn validate(&self) -> Result<Registration, ValidationError> {
    if self.email.is_empty() {
      return Err(ValidationError::MissingEmail);
    }
    if !self.email.contains('@') {
      return Err(ValidationError::InvalidEmail);
    }
    if self.password.is_empty() {
      return Err(ValidationError::MissingPassword);
    }
    if self.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(ValidationError::PasswordTooShort);
    }
    if self.password != self.confirm_password {
      return Err(ValidationError::PasswordMismatch);
    }
    let language = self.language.ok_or(ValidationError::MissingLanguage)?;
    let gender = self.gender.ok_or(ValidationError::MissingGender)?;
    if !self.accepted_terms {
      return Err(ValidationError::TermsNotAccepted);
    }

    Ok(Registration {
      email: self.email.clone(),
      password: self.password.clone(),
      gender,
      language,
      biometric: self.biometric,
      home_address: self
        .home_address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_owned),
    })
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "biometric", rename_all = "snake_case")]
pub enum AuthMethod {
  Password,
  Biometric(BiometricKind),
  Registration,
}

/// Proof of a successful sign-in. Lives only in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
  pub session_id:    Uuid,
  pub user:          Option<String>,
  pub method:        AuthMethod,
  pub authenticated: DateTime<Utc>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Backend that verifies identities.
///
/// Every call is fallible even though the bundled simulation always succeeds
/// after its configured latency.
pub trait Authenticator: Send + Sync {
  fn login<'a>(
    &'a self,
    credentials: &'a Credentials,
  ) -> impl Future<Output = Result<AuthSession, AuthError>> + Send + 'a;

  fn biometric_login(
    &self,
    kind: BiometricKind,
  ) -> impl Future<Output = Result<AuthSession, AuthError>> + Send + '_;

  /// Enrol a biometric method ahead of registration.
  fn enroll_biometric(
    &self,
    kind: BiometricKind,
  ) -> impl Future<Output = Result<(), AuthError>> + Send + '_;

  fn register<'a>(
    &'a self,
    registration: &'a Registration,
  ) -> impl Future<Output = Result<AuthSession, AuthError>> + Send + 'a;

  fn change_password<'a>(
    &'a self,
    current: &'a str,
    new: &'a str,
  ) -> impl Future<Output = Result<(), AuthError>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form() -> RegistrationForm {
    RegistrationForm {
      email:            "ana@example.com".into(),
      password:         "segredo".into(),
      confirm_password: "segredo".into(),
      gender:           Some(Gender::Female),
      language:         Some(Language::Pt),
      biometric:        None,
      home_address:     Some("  ".into()),
      accepted_terms:   true,
    }
  }

  #[test]
  fn valid_registration_drops_blank_address() {
    let reg = form().validate().unwrap();
    assert_eq!(reg.gender, Gender::Female);
    assert_eq!(reg.home_address, None);
  }

  #[test]
  fn registration_rules_in_order() {
    let cases: Vec<(RegistrationForm, ValidationError)> = vec![
      (RegistrationForm { email: String::new(), ..form() }, ValidationError::MissingEmail),
      (RegistrationForm { email: "ana".into(), ..form() }, ValidationError::InvalidEmail),
      (
        RegistrationForm { password: String::new(), ..form() },
        ValidationError::MissingPassword,
      ),
      (
        RegistrationForm { password: "abc".into(), confirm_password: "abc".into(), ..form() },
        ValidationError::PasswordTooShort,
      ),
      (
        RegistrationForm { confirm_password: "outro123".into(), ..form() },
        ValidationError::PasswordMismatch,
      ),
      (RegistrationForm { language: None, ..form() }, ValidationError::MissingLanguage),
      (RegistrationForm { gender: None, ..form() }, ValidationError::MissingGender),
      (
        RegistrationForm { accepted_terms: false, ..form() },
        ValidationError::TermsNotAccepted,
      ),
    ];
    for (input, expected) in cases {
      assert_eq!(input.validate().unwrap_err(), expected);
    }
  }

  #[test]
  fn credentials_need_both_fields() {
    let creds = Credentials { username: "ana".into(), password: String::new() };
    assert_eq!(creds.validate().unwrap_err(), ValidationError::MissingCredentials);
  }
}
