use std::{sync::Arc, time::Duration};

use safesteps_core::{
  auth::{
    AuthError, AuthMethod, AuthSession, Authenticator, BiometricKind, Credentials, Registration,
  },
  clock::Clock,
};
use uuid::Uuid;

/// Accepts every request after a fixed latency, unless switched offline.
pub struct SimulatedAuth {
  latency:           Duration,
  biometric_latency: Duration,
  online:            bool,
  clock:             Arc<dyn Clock>,
}

impl SimulatedAuth {
  pub fn new(latency: Duration, biometric_latency: Duration, clock: Arc<dyn Clock>) -> Self {
    Self { latency, biometric_latency, online: true, clock }
  }

  /// Every call fails with [`AuthError::Unavailable`].
  pub fn offline(mut self) -> Self {
    self.online = false;
    self
  }

  async fn respond(&self, delay: Duration) -> Result<(), AuthError> {
    tokio::time::sleep(delay).await;
    if self.online {
      Ok(())
    } else {
      Err(AuthError::Unavailable("sem conexão".into()))
    }
  }

  fn session(&self, user: Option<String>, method: AuthMethod) -> AuthSession {
    let session = AuthSession {
      session_id: Uuid::new_v4(),
      user,
      method,
      authenticated: self.clock.now(),
    };
    tracing::info!(session = %session.session_id, ?method, "session opened");
    session
  }
}

impl Authenticator for SimulatedAuth {
  async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
    self.respond(self.latency).await?;
    Ok(self.session(Some(credentials.username.clone()), AuthMethod::Password))
  }

  async fn biometric_login(&self, kind: BiometricKind) -> Result<AuthSession, AuthError> {
    self.respond(self.biometric_latency).await?;
    Ok(self.session(None, AuthMethod::Biometric(kind)))
  }

  async fn enroll_biometric(&self, _kind: BiometricKind) -> Result<(), AuthError> {
    self.respond(self.biometric_latency).await
  }

  async fn register(&self, registration: &Registration) -> Result<AuthSession, AuthError> {
    self.respond(self.biometric_latency).await?;
    Ok(self.session(Some(registration.email.clone()), AuthMethod::Registration))
  }

  async fn change_password(&self, _current: &str, _new: &str) -> Result<(), AuthError> {
    self.respond(self.latency).await
  }
}
