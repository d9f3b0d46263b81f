//! The voice-mode assistant: listens for a command and speaks the reply.

use safesteps_core::{
  position::Position,
  speech::{RecognitionError, SpeechRecognizer, SpeechSink},
  voice::{self, EMERGENCY_MESSAGE, EMERGENCY_SPOKEN, GREETING, NOT_UNDERSTOOD, PoliceStation},
};

pub struct VoiceAssistant<R, S> {
  recognizer:   R,
  speech:       S,
  locale:       String,
  /// Text currently shown as the assistant's message.
  message:      String,
  /// The last recognised utterance, verbatim.
  last_command: Option<String>,
  listening:    bool,
  active:       bool,
}

impl<R: SpeechRecognizer, S: SpeechSink> VoiceAssistant<R, S> {
  pub fn new(recognizer: R, speech: S, locale: impl Into<String>) -> Self {
    Self {
      recognizer,
      speech,
      locale: locale.into(),
      message: GREETING.to_string(),
      last_command: None,
      listening: false,
      active: false,
    }
  }

  pub fn message(&self) -> &str { &self.message }

  pub fn last_command(&self) -> Option<&str> { self.last_command.as_deref() }

  pub fn is_listening(&self) -> bool { self.listening }

  pub fn is_active(&self) -> bool { self.active }

  /// Voice mode became visible. Speaks the greeting once per entry.
  pub fn enter(&mut self) {
    if self.active {
      return;
    }
    self.active = true;
    self.last_command = None;
    self.say(GREETING.to_string());
  }

  /// Voice mode was closed.
  pub fn exit(&mut self) {
    self.active = false;
    self.listening = false;
  }

  /// Listen for one command and answer it.
  pub async fn listen(
    &mut self,
    position: Option<&Position>,
    stations: &[PoliceStation],
  ) -> Result<String, RecognitionError> {
    self.listening = true;
    let heard = self.recognizer.recognize().await;
    self.listening = false;

    match heard {
      Ok(text) => {
        tracing::info!(command = %text, "voice command recognised");
        let reply = voice::dispatch(&text, position, stations);
        self.last_command = Some(text);
        self.say(reply.clone());
        Ok(reply)
      }
      Err(e) => {
        tracing::warn!(error = %e, "voice recognition failed");
        self.say(NOT_UNDERSTOOD.to_string());
        Err(e)
      }
    }
  }

  /// Announce the emergency call.
  pub fn emergency(&mut self) {
    self.message = EMERGENCY_MESSAGE.to_string();
    self.speech.speak(EMERGENCY_SPOKEN, &self.locale);
  }

  fn say(&mut self, text: String) {
    self.speech.speak(&text, &self.locale);
    self.message = text;
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::sim::{SimulatedRecognizer, SpeechLog};

  fn assistant(script: &[&str]) -> (VoiceAssistant<SimulatedRecognizer, SpeechLog>, SpeechLog) {
    let log = SpeechLog::default();
    let recognizer = SimulatedRecognizer::scripted(Duration::ZERO, script.iter().copied());
    (VoiceAssistant::new(recognizer, log.clone(), "pt-BR"), log)
  }

  #[test]
  fn greeting_is_spoken_once_per_entry() {
    let (mut a, log) = assistant(&[]);
    a.enter();
    a.enter();
    assert_eq!(log.transcript(), vec![GREETING.to_string()]);

    a.exit();
    a.enter();
    assert_eq!(log.transcript().len(), 2);
  }

  #[tokio::test]
  async fn listen_dispatches_and_speaks() {
    let (mut a, log) = assistant(&["onde estou"]);
    a.enter();
    let pos = Position::new(-23.5, -46.6, 0);
    let reply = a.listen(Some(&pos), &[]).await.unwrap();

    assert!(reply.contains("Latitude -23.5000"));
    assert_eq!(a.message(), reply);
    assert_eq!(a.last_command(), Some("onde estou"));
    assert!(!a.is_listening());
    assert_eq!(log.transcript().last(), Some(&reply));
  }

  #[tokio::test]
  async fn exhausted_script_reports_no_speech() {
    let (mut a, _) = assistant(&[]);
    assert_eq!(a.listen(None, &[]).await.unwrap_err(), RecognitionError::NoSpeech);
    assert_eq!(a.message(), NOT_UNDERSTOOD);
  }

  #[test]
  fn emergency_speaks_short_form() {
    let (mut a, log) = assistant(&[]);
    a.emergency();
    assert_eq!(a.message(), EMERGENCY_MESSAGE);
    assert_eq!(log.transcript(), vec![EMERGENCY_SPOKEN.to_string()]);
  }
}
