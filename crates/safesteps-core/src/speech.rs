//! Speech input and output capabilities.

use std::future::Future;

use thiserror::Error;

/// Locale used for every utterance.
pub const DEFAULT_LOCALE: &str = "pt-BR";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
  #[error("nothing was heard")]
  NoSpeech,
  #[error("microphone unavailable")]
  Unavailable,
  #[error("recognition aborted")]
  Aborted,
}

/// Turns the user's speech into text.
pub trait SpeechRecognizer: Send + Sync {
  fn recognize(&self) -> impl Future<Output = Result<String, RecognitionError>> + Send + '_;
}

/// Speaks text aloud. Fire-and-forget: playback is never awaited and
/// failures are the sink's own business.
pub trait SpeechSink: Send + Sync {
  fn speak(&self, text: &str, locale: &str);
}
