//! [`App`]: the application state and every user-facing operation.
//!
//! Each operation updates in-memory state, persists what changed, and queues
//! a [`Notice`] describing the outcome. Validation and authentication
//! failures are both returned and queued; the caller only needs to drain the
//! notices to keep the user informed.

use std::{collections::VecDeque, sync::Arc};

use safesteps_core::{
  auth::{AuthSession, Authenticator, BiometricKind, Credentials, RegistrationForm},
  geolocation::{GeolocationProvider, PositionOptions, WatchEvent, WatchEvents, WatchId, WatchSink},
  location::SavedLocation,
  navigation::{NavEvent, NavState, Outcome, Screen, reduce},
  notice::Notice,
  occurrence::{Occurrence, OccurrenceForm},
  position::Position,
  preferences::{Language, PasswordChange, Preferences, Voice},
  voice::{PoliceStation, visible_stations},
};
use tokio::sync::mpsc;

use crate::{
  Adapters, Error, Platform, Result,
  assistant::VoiceAssistant,
  locations::LocationStore,
  occurrences::OccurrenceStore,
  preferences::{PreferenceStore, photo_data_url},
  tracker::Tracker,
};

/// Result of [`App::toggle_tracking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
  Started(WatchId),
  Stopped(WatchId),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<P: Platform> {
  nav:         NavState,
  session:     Option<AuthSession>,
  prefs:       PreferenceStore<P::Storage>,
  locations:   LocationStore<P::Storage>,
  occurrences: OccurrenceStore<P::Storage>,
  tracker:     Tracker,
  assistant:   VoiceAssistant<P::Recognizer, P::Speech>,
  geolocation: P::Geolocation,
  auth:        P::Auth,
  watch_sink:  WatchSink,
  notices:     VecDeque<Notice>,
}

impl<P: Platform> App<P> {
  /// Read persisted state and build the app.
  ///
  /// Returns the receiving end of the watch channel; the event loop must
  /// feed every event it yields to [`App::handle_watch_event`].
  pub async fn load(adapters: Adapters<P>) -> Result<(Self, WatchEvents)> {
    let Adapters { storage, geolocation, auth, recognizer, speech, clock, locale } = adapters;

    let prefs = PreferenceStore::load(storage.clone()).await?;
    let locations = LocationStore::load(storage.clone(), Arc::clone(&clock)).await?;
    let occurrences = OccurrenceStore::load(storage, clock).await?;

    let p = prefs.get();
    let nav = NavState::initial(p.terms_accepted, false, p.visually_impaired);
    tracing::info!(
      screen = %nav.screen(),
      saved_locations = locations.list().len(),
      occurrences = occurrences.list().len(),
      "app state loaded"
    );

    let (watch_sink, watch_events) = mpsc::unbounded_channel();
    let app = Self {
      nav,
      session: None,
      prefs,
      locations,
      occurrences,
      tracker: Tracker::default(),
      assistant: VoiceAssistant::new(recognizer, speech, locale),
      geolocation,
      auth,
      watch_sink,
      notices: VecDeque::new(),
    };
    Ok((app, watch_events))
  }

  // ── Read access ───────────────────────────────────────────────────────────

  pub fn screen(&self) -> Screen { self.nav.screen() }

  pub fn nav(&self) -> &NavState { &self.nav }

  pub fn session(&self) -> Option<&AuthSession> { self.session.as_ref() }

  pub fn preferences(&self) -> &Preferences { self.prefs.get() }

  pub fn saved_locations(&self) -> &[SavedLocation] { self.locations.list() }

  pub fn occurrences(&self) -> &[Occurrence] { self.occurrences.list() }

  pub fn tracker(&self) -> &Tracker { &self.tracker }

  pub fn position(&self) -> Option<&Position> { self.tracker.position() }

  pub fn assistant(&self) -> &VoiceAssistant<P::Recognizer, P::Speech> { &self.assistant }

  pub fn geolocation(&self) -> &P::Geolocation { &self.geolocation }

  /// Police stations visible under the current preferences.
  pub fn police_stations(&self) -> &'static [PoliceStation] {
    visible_stations(self.prefs.get().show_police_stations)
  }

  /// Take every queued notice, oldest first.
  pub fn drain_notices(&mut self) -> Vec<Notice> { self.notices.drain(..).collect() }

  // ── Internals ─────────────────────────────────────────────────────────────

  fn notify(&mut self, notice: Notice) { self.notices.push_back(notice); }

  /// Queue the user-facing message of `err`, if it has one, and return it.
  fn fail<T>(&mut self, err: impl Into<Error>) -> Result<T> {
    let err = err.into();
    if let Some(message) = err.user_message() {
      self.notify(Notice::error(message));
    }
    Err(err)
  }

  fn require(&self, screen: Screen) -> Result<()> {
    if self.screen() == screen { Ok(()) } else { Err(Error::WrongScreen(self.screen())) }
  }

  fn require_authenticated(&self) -> Result<()> {
    if self.nav.authenticated { Ok(()) } else { Err(Error::NotAuthenticated) }
  }

  /// Run `event` through the reducer, persist the terms flag when it flips,
  /// and keep the assistant in step with voice mode.
  async fn navigate(&mut self, event: NavEvent) -> Result<Outcome> {
    let (next, outcome) = reduce(self.nav, event);
    self.nav = next;

    if let Outcome::Refused(reason) = outcome {
      self.notify(Notice::error(reason));
    }
    if self.nav.terms_accepted && !self.prefs.get().terms_accepted {
      self.prefs.set_terms_accepted(true).await?;
    }

    let in_voice_mode = self.screen() == Screen::VoiceMode;
    if in_voice_mode && !self.assistant.is_active() {
      self.assistant.enter();
    } else if !in_voice_mode && self.assistant.is_active() {
      self.assistant.exit();
    }

    Ok(outcome)
  }

  // ── Terms ─────────────────────────────────────────────────────────────────

  pub async fn accept_terms(&mut self) -> Result<()> {
    self.require(Screen::Terms)?;
    self.navigate(NavEvent::AcceptTerms).await?;
    Ok(())
  }

  pub async fn decline_terms(&mut self) -> Result<()> {
    self.require(Screen::Terms)?;
    self.navigate(NavEvent::DeclineTerms).await?;
    Ok(())
  }

  // ── Authentication ────────────────────────────────────────────────────────

  pub async fn login(&mut self, credentials: Credentials) -> Result<()> {
    self.require(Screen::Login)?;
    if let Err(e) = credentials.validate() {
      return self.fail(e);
    }
    match self.auth.login(&credentials).await {
      Ok(session) => self.signed_in(session, "Login realizado com sucesso!".into()).await,
      Err(e) => self.fail(e),
    }
  }

  pub async fn biometric_login(&mut self, kind: BiometricKind) -> Result<()> {
    self.require(Screen::Login)?;
    match self.auth.biometric_login(kind).await {
      Ok(session) => {
        let message = format!("Autenticação {} realizada!", kind.describe());
        self.signed_in(session, message).await
      }
      Err(e) => self.fail(e),
    }
  }

  async fn signed_in(&mut self, session: AuthSession, message: String) -> Result<()> {
    self.session = Some(session);
    self.navigate(NavEvent::LoggedIn).await?;
    self.notify(Notice::success(message));
    Ok(())
  }

  pub async fn open_register(&mut self) -> Result<()> {
    self.require(Screen::Login)?;
    self.navigate(NavEvent::OpenRegister).await?;
    Ok(())
  }

  /// Validate the sign-up form, enrol biometrics if requested, create the
  /// account and sign in. Profile fields are persisted only once the backend
  /// accepted the registration.
  pub async fn register(&mut self, form: RegistrationForm) -> Result<()> {
    self.require(Screen::Register)?;
    let registration = match form.validate() {
      Ok(r) => r,
      Err(e) => return self.fail(e),
    };

    if let Some(kind) = registration.biometric {
      if let Err(e) = self.auth.enroll_biometric(kind).await {
        return self.fail(e);
      }
      self.notify(Notice::success(format!("Biometria {kind} cadastrada com sucesso!")));
    }

    let session = match self.auth.register(&registration).await {
      Ok(s) => s,
      Err(e) => return self.fail(e),
    };

    self.prefs.set_email(&registration.email).await?;
    self.prefs.set_gender(registration.gender).await?;
    self.prefs.set_language(registration.language).await?;
    if let Some(address) = &registration.home_address {
      self.prefs.set_home_address(address).await?;
    }

    self.session = Some(session);
    self.navigate(NavEvent::Registered).await?;
    self.notify(Notice::success("Conta criada com sucesso!"));
    Ok(())
  }

  pub async fn logout(&mut self) -> Result<()> {
    self.require_authenticated()?;
    if let Some(id) = self.tracker.stop_watch() {
      self.geolocation.clear_watch(id);
    }
    self.session = None;
    self.navigate(NavEvent::Logout).await?;
    self.notify(Notice::info("Você saiu do aplicativo"));
    Ok(())
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  pub async fn open_profile(&mut self) -> Result<()> {
    self.require(Screen::Main)?;
    self.navigate(NavEvent::OpenProfile).await?;
    Ok(())
  }

  pub async fn open_settings(&mut self) -> Result<()> {
    self.require(Screen::Main)?;
    self.navigate(NavEvent::OpenSettings).await?;
    Ok(())
  }

  /// Follow the current screen's back target. Returns whether it moved.
  pub async fn back(&mut self) -> Result<bool> {
    Ok(self.navigate(NavEvent::Back).await? == Outcome::Applied)
  }

  pub async fn enter_voice_mode(&mut self) -> Result<()> {
    self.require(Screen::Main)?;
    self.navigate(NavEvent::EnterVoiceMode).await?;
    Ok(())
  }

  pub async fn exit_voice_mode(&mut self) -> Result<()> {
    self.require(Screen::VoiceMode)?;
    self.navigate(NavEvent::ExitVoiceMode).await?;
    Ok(())
  }

  // ── Profile & settings ────────────────────────────────────────────────────

  /// Persist the flag; turning it on while signed in opens voice mode.
  pub async fn set_visually_impaired(&mut self, flag: bool) -> Result<()> {
    self.prefs.set_visually_impaired(flag).await?;
    self.navigate(NavEvent::SetVisuallyImpaired(flag)).await?;
    Ok(())
  }

  pub async fn set_show_police_stations(&mut self, flag: bool) -> Result<()> {
    self.prefs.set_show_police_stations(flag).await
  }

  pub async fn change_language(&mut self, code: &str) -> Result<()> {
    let language = match Language::parse_setting(code) {
      Ok(l) => l,
      Err(e) => return self.fail(e),
    };
    self.prefs.set_language(language).await?;
    self.notify(Notice::success("Idioma alterado com sucesso!"));
    Ok(())
  }

  pub async fn change_voice(&mut self, voice: Voice) -> Result<()> {
    self.prefs.set_voice(voice).await?;
    self.notify(Notice::success("Voz alterada com sucesso!"));
    Ok(())
  }

  pub async fn change_password(&mut self, change: PasswordChange) -> Result<()> {
    self.require_authenticated()?;
    if let Err(e) = change.validate() {
      return self.fail(e);
    }
    if let Err(e) = self.auth.change_password(&change.current, &change.new).await {
      return self.fail(e);
    }
    self.notify(Notice::success("Senha alterada com sucesso!"));
    Ok(())
  }

  pub async fn set_home_address(&mut self, address: &str) -> Result<()> {
    self.require_authenticated()?;
    let address = address.trim();
    if address.is_empty() {
      return self.fail(safesteps_core::ValidationError::EmptyHomeAddress);
    }
    self.prefs.set_home_address(address).await?;
    self.notify(Notice::success("Endereço atualizado com sucesso!"));
    Ok(())
  }

  pub async fn set_photo(&mut self, media_type: &str, bytes: &[u8]) -> Result<()> {
    self.require_authenticated()?;
    let url = match photo_data_url(media_type, bytes) {
      Ok(url) => url,
      Err(e) => return self.fail(e),
    };
    self.prefs.set_photo(url).await?;
    self.notify(Notice::success("Foto atualizada com sucesso!"));
    Ok(())
  }

  // ── Geolocation ───────────────────────────────────────────────────────────

  /// Take one fresh, high-accuracy reading.
  pub async fn locate(&mut self) -> Result<Position> {
    self.require_authenticated()?;
    self.tracker.begin_locate();
    let reading = self.geolocation.current_position(PositionOptions::default()).await;
    match self.tracker.finish_locate(reading) {
      Ok(position) => {
        self.notify(Notice::success("Localização obtida com sucesso!"));
        Ok(position)
      }
      Err(e) => {
        self.notify(Notice::error(e.locate_message()));
        Err(e.into())
      }
    }
  }

  /// Start continuous tracking, or stop it if it is already running.
  pub async fn toggle_tracking(&mut self) -> Result<Tracking> {
    self.require_authenticated()?;
    if let Some(id) = self.tracker.stop_watch() {
      self.geolocation.clear_watch(id);
      self.notify(Notice::info("Rastreamento contínuo desativado"));
      return Ok(Tracking::Stopped(id));
    }

    match self
      .geolocation
      .watch_position(PositionOptions::default(), self.watch_sink.clone())
    {
      Ok(id) => {
        self.tracker.start_watch(id);
        self.notify(Notice::success("Rastreamento contínuo ativado!"));
        Ok(Tracking::Started(id))
      }
      Err(e) => {
        self.notify(Notice::error(e.tracking_message()));
        Err(e.into())
      }
    }
  }

  /// Clear the geolocation error shown on the main screen.
  pub fn dismiss_error(&mut self) -> bool {
    let had_error = self.tracker.error().is_some();
    self.tracker.dismiss_error();
    had_error
  }

  /// Feed one watch callback. Returns whether it changed anything.
  pub fn handle_watch_event(&mut self, event: WatchEvent) -> bool { self.tracker.apply(event) }

  // ── Saved locations ───────────────────────────────────────────────────────

  /// Save the current position under `name`.
  pub async fn save_location(&mut self, name: &str) -> Result<SavedLocation> {
    self.require_authenticated()?;
    let position = self.tracker.position().copied();
    match self.locations.save(name, position.as_ref()).await {
      Ok(saved) => {
        self.notify(Notice::success(format!(
          "Localização \"{}\" salva com sucesso!",
          saved.name
        )));
        Ok(saved)
      }
      Err(e) => self.fail(e),
    }
  }

  pub async fn delete_location(&mut self, id: &str) -> Result<bool> {
    self.require_authenticated()?;
    let removed = self.locations.delete(id).await?;
    if removed {
      self.notify(Notice::success("Localização removida"));
    }
    Ok(removed)
  }

  /// Show a saved location as the current position. The saved collection is
  /// not touched.
  pub fn navigate_to(&mut self, id: &str) -> Result<Position> {
    self.require_authenticated()?;
    let position = self
      .locations
      .get(id)
      .map(SavedLocation::to_position)
      .ok_or_else(|| Error::UnknownLocation(id.to_string()))?;
    self.tracker.show(position);
    Ok(position)
  }

  // ── Occurrences ───────────────────────────────────────────────────────────

  pub async fn submit_occurrence(&mut self, form: &OccurrenceForm) -> Result<Occurrence> {
    self.require_authenticated()?;
    match self.occurrences.submit(form).await {
      Ok(occurrence) => {
        self.notify(Notice::success("Ocorrência registrada com sucesso!"));
        Ok(occurrence)
      }
      Err(e) => self.fail(e),
    }
  }

  // ── Voice mode ────────────────────────────────────────────────────────────

  /// Listen for one command and return the assistant's reply.
  pub async fn voice_listen(&mut self) -> Result<String> {
    self.require(Screen::VoiceMode)?;
    let stations = self.police_stations();
    let position = self.tracker.position().copied();
    Ok(self.assistant.listen(position.as_ref(), stations).await?)
  }

  pub fn voice_emergency(&mut self) -> Result<()> {
    self.require(Screen::VoiceMode)?;
    self.assistant.emergency();
    Ok(())
  }
}
