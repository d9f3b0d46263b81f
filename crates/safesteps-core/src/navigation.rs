//! Screen navigation as a pure reducer.
//!
//! The visible screen is a function of a handful of flags. Every user action
//! becomes a [`NavEvent`]; [`reduce`] returns the next state plus an
//! [`Outcome`] telling the caller whether anything happened. Events that make
//! no sense on the current screen are ignored rather than rejected.

use serde::{Deserialize, Serialize};
use strum::Display;

pub const TERMS_DECLINED: &str = "Você precisa aceitar os termos para usar o aplicativo";

// ─── Screens ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
  Terms,
  Login,
  Register,
  Main,
  Profile,
  Settings,
  VoiceMode,
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
  AcceptTerms,
  DeclineTerms,
  /// Credentials or biometrics were verified on the login screen.
  LoggedIn,
  OpenRegister,
  /// The registration form was accepted by the backend.
  Registered,
  OpenProfile,
  OpenSettings,
  /// Follow the single back target of the current screen.
  Back,
  EnterVoiceMode,
  ExitVoiceMode,
  SetVisuallyImpaired(bool),
  Logout,
}

/// What [`reduce`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Applied,
  /// The event does not apply to the current screen.
  Ignored,
  /// The event was understood but refused; carries the user-facing reason.
  Refused(&'static str),
}

// ─── State ───────────────────────────────────────────────────────────────────

/// The complete navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
  pub authenticated:     bool,
  pub terms_accepted:    bool,
  pub voice_mode:        bool,
  pub visually_impaired: bool,
  /// Underlying screen; hidden while `voice_mode` is on.
  current:               Screen,
}

impl NavState {
  /// Startup state from persisted flags.
  pub fn initial(terms_accepted: bool, authenticated: bool, visually_impaired: bool) -> Self {
    let current = match (terms_accepted, authenticated) {
      (_, true) => Screen::Main,
      (true, false) => Screen::Login,
      (false, false) => Screen::Terms,
    };
    Self {
      authenticated,
      terms_accepted,
      voice_mode: authenticated && visually_impaired,
      visually_impaired,
      current,
    }
  }

  /// The one screen currently visible.
  pub fn screen(&self) -> Screen {
    if self.authenticated && self.voice_mode {
      Screen::VoiceMode
    } else {
      self.current
    }
  }
}

// ─── Reducer ─────────────────────────────────────────────────────────────────

/// Apply `event` to `state`.
pub fn reduce(state: NavState, event: NavEvent) -> (NavState, Outcome) {
  let mut next = state;
  let screen = state.screen();

  let outcome = match (screen, event) {
    (Screen::Terms, NavEvent::AcceptTerms) => {
      next.terms_accepted = true;
      next.current = Screen::Login;
      Outcome::Applied
    }
    (Screen::Terms, NavEvent::DeclineTerms) => Outcome::Refused(TERMS_DECLINED),

    (Screen::Login, NavEvent::LoggedIn) => {
      next.authenticated = true;
      next.current = Screen::Main;
      Outcome::Applied
    }
    (Screen::Login, NavEvent::OpenRegister) => {
      next.current = Screen::Register;
      Outcome::Applied
    }
    (Screen::Register, NavEvent::Back) => {
      next.current = Screen::Login;
      Outcome::Applied
    }
    (Screen::Register, NavEvent::Registered) => {
      next.authenticated = true;
      next.terms_accepted = true;
      next.current = Screen::Main;
      Outcome::Applied
    }

    (Screen::Main, NavEvent::OpenProfile) => {
      next.current = Screen::Profile;
      Outcome::Applied
    }
    (Screen::Main, NavEvent::OpenSettings) => {
      next.current = Screen::Settings;
      Outcome::Applied
    }
    (Screen::Profile | Screen::Settings, NavEvent::Back) => {
      next.current = Screen::Main;
      Outcome::Applied
    }

    (Screen::Main, NavEvent::EnterVoiceMode) => {
      next.voice_mode = true;
      Outcome::Applied
    }
    (Screen::VoiceMode, NavEvent::ExitVoiceMode | NavEvent::Back) => {
      next.voice_mode = false;
      next.current = Screen::Main;
      Outcome::Applied
    }

    (_, NavEvent::SetVisuallyImpaired(flag)) => {
      next.visually_impaired = flag;
      Outcome::Applied
    }

    (_, NavEvent::Logout) if state.authenticated => {
      next.authenticated = false;
      next.voice_mode = false;
      next.current = Screen::Login;
      Outcome::Applied
    }

    _ => Outcome::Ignored,
  };

  // Entering voice mode is automatic the moment both flags become true.
  let became_eligible = next.authenticated
    && next.visually_impaired
    && !(state.authenticated && state.visually_impaired);
  if became_eligible {
    next.voice_mode = true;
  }

  if outcome == Outcome::Ignored {
    tracing::debug!(?screen, ?event, "navigation event ignored");
  } else if next.screen() != screen {
    tracing::info!(from = %screen, to = %next.screen(), "screen changed");
  }

  (next, outcome)
}
