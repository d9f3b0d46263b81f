//! Error type for `safesteps-app`.

use safesteps_core::{
  ValidationError, auth::AuthError, geolocation::GeoError, navigation::Screen,
  speech::RecognitionError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("geolocation failed: {0}")]
  Geolocation(#[from] GeoError),

  #[error(transparent)]
  Auth(#[from] AuthError),

  #[error("speech recognition failed: {0}")]
  Recognition(#[from] RecognitionError),

  #[error("core error: {0}")]
  Core(#[from] safesteps_core::Error),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("action not available on the {0} screen")]
  WrongScreen(Screen),

  #[error("sign in first")]
  NotAuthenticated,

  #[error("no saved location with id {0:?}")]
  UnknownLocation(String),
}

impl Error {
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }

  /// The message shown to the user, for errors that are surfaced as notices.
  pub fn user_message(&self) -> Option<String> {
    match self {
      Self::Validation(e) => Some(e.to_string()),
      Self::Auth(e) => Some(e.to_string()),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
