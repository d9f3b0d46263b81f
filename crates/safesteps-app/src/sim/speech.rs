use std::{
  collections::VecDeque,
  sync::{Arc, Mutex},
  time::Duration,
};

use rand_core::{OsRng, RngCore as _};
use safesteps_core::{
  speech::{RecognitionError, SpeechRecognizer, SpeechSink},
  voice::VoiceCommand,
};

use super::lock;

enum Source {
  /// Pick a phrase from the command vocabulary at random.
  Random,
  /// Replay queued phrases, then report silence.
  Script(Mutex<VecDeque<String>>),
}

/// Recogniser that "hears" a canned phrase after a delay.
pub struct SimulatedRecognizer {
  latency: Duration,
  source:  Source,
}

impl SimulatedRecognizer {
  pub fn random(latency: Duration) -> Self { Self { latency, source: Source::Random } }

  pub fn scripted<'a>(latency: Duration, phrases: impl IntoIterator<Item = &'a str>) -> Self {
    let queue = phrases.into_iter().map(str::to_owned).collect();
    Self { latency, source: Source::Script(Mutex::new(queue)) }
  }
}

impl SpeechRecognizer for SimulatedRecognizer {
  async fn recognize(&self) -> Result<String, RecognitionError> {
    tokio::time::sleep(self.latency).await;
    match &self.source {
      Source::Random => {
        let vocabulary: Vec<_> = VoiceCommand::vocabulary().collect();
        let pick = OsRng.next_u32() as usize % vocabulary.len();
        Ok(vocabulary[pick].to_string())
      }
      Source::Script(queue) => lock(queue).pop_front().ok_or(RecognitionError::NoSpeech),
    }
  }
}

/// Speech output that logs each utterance and keeps a transcript.
/// Clones share the transcript.
#[derive(Debug, Clone, Default)]
pub struct SpeechLog {
  transcript: Arc<Mutex<Vec<String>>>,
}

impl SpeechLog {
  pub fn transcript(&self) -> Vec<String> { lock(&self.transcript).clone() }
}

impl SpeechSink for SpeechLog {
  fn speak(&self, text: &str, locale: &str) {
    tracing::info!(locale, text, "speaking");
    lock(&self.transcript).push(text.to_string());
  }
}
