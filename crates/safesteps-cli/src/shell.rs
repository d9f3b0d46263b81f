//! The interactive loop: reads commands from stdin, applies watch readings
//! as they arrive, and prints notices after every step.

use std::{io::Write as _, path::Path};

use safesteps_app::{App, Error, Platform};
use safesteps_core::geolocation::WatchEvents;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
  command::{self, Command, HELP, Setting},
  render,
};

pub async fn run<P: Platform>(mut app: App<P>, mut events: WatchEvents) -> anyhow::Result<()> {
  let mut lines = BufReader::new(tokio::io::stdin()).lines();

  render::screen(&app);
  prompt();

  loop {
    tokio::select! {
      line = lines.next_line() => {
        let Some(line) = line? else { break };
        let command = match command::parse(&line) {
          Ok(Some(Command::Quit)) => break,
          Ok(Some(command)) => command,
          Ok(None) => {
            prompt();
            continue;
          }
          Err(e) => {
            println!("{e}");
            prompt();
            continue;
          }
        };

        let before = app.screen();
        if let Err(e) = execute(&mut app, command).await {
          unreported(&e);
        }
        render::notices(&app.drain_notices());
        if app.screen() != before {
          render::screen(&app);
        }
        prompt();
      }
      Some(event) = events.recv() => {
        if app.handle_watch_event(event) {
          match (app.position(), app.tracker().error()) {
            (_, Some(error)) => println!("\n✗ {error}"),
            (Some(position), None) => println!("\n📍 {}", render::position(position)),
            (None, None) => {}
          }
          prompt();
        }
      }
    }
  }

  tracing::info!("shell closed");
  Ok(())
}

fn prompt() {
  print!("> ");
  std::io::stdout().flush().ok();
}

/// Print errors the app did not already queue as a notice.
fn unreported(e: &Error) {
  match e {
    Error::Validation(_) | Error::Auth(_) | Error::Geolocation(_) => {}
    other => println!("✗ {other}"),
  }
}

async fn execute<P: Platform>(app: &mut App<P>, command: Command) -> safesteps_app::Result<()> {
  match command {
    Command::Status => render::screen(app),
    Command::Help => println!("{HELP}"),
    Command::Quit => {}

    Command::Accept => app.accept_terms().await?,
    Command::Decline => app.decline_terms().await?,
    Command::Login(credentials) => app.login(credentials).await?,
    Command::Biometric(kind) => {
      println!("Autenticando...");
      app.biometric_login(kind).await?
    }
    Command::OpenRegister => app.open_register().await?,
    Command::Register(form) => app.register(form).await?,
    Command::Logout => app.logout().await?,

    Command::Back => {
      if !app.back().await? {
        println!("nada para voltar");
      }
    }
    Command::Profile => app.open_profile().await?,
    Command::Settings => app.open_settings().await?,

    Command::Voice => app.enter_voice_mode().await?,
    Command::Listen => {
      println!("Ouvindo...");
      let reply = app.voice_listen().await;
      println!("🔊 {}", app.assistant().message());
      reply?;
    }
    Command::Emergency => {
      app.voice_emergency()?;
      println!("🔊 {}", app.assistant().message());
    }

    Command::Locate => {
      let position = app.locate().await?;
      println!("📍 {}", render::position(&position));
    }
    Command::Track => {
      app.toggle_tracking().await?;
    }
    Command::Dismiss => {
      if !app.dismiss_error() {
        println!("nenhum erro");
      }
    }

    Command::Save(name) => {
      app.save_location(&name).await?;
    }
    Command::Delete(id) => {
      if !app.delete_location(&id).await? {
        println!("nenhum local com id {id}");
      }
    }
    Command::Goto(id) => {
      let position = app.navigate_to(&id)?;
      println!("📍 {}", render::position(&position));
    }
    Command::Locations => render::locations(app),

    Command::Report(form) => {
      let occurrence = app.submit_occurrence(&form).await?;
      println!("#{} {}", occurrence.short_id(), occurrence.kind);
    }
    Command::Occurrences => render::occurrences(app),

    Command::Set(setting) => match setting {
      Setting::VisuallyImpaired(flag) => app.set_visually_impaired(flag).await?,
      Setting::PoliceStations(flag) => app.set_show_police_stations(flag).await?,
      Setting::Language(code) => app.change_language(&code).await?,
      Setting::Voice(voice) => app.change_voice(voice).await?,
    },
    Command::Password(change) => app.change_password(change).await?,
    Command::Address(address) => app.set_home_address(&address).await?,
    Command::Photo(path) => match tokio::fs::read(&path).await {
      Ok(bytes) => app.set_photo(media_type(&path), &bytes).await?,
      Err(e) => println!("✗ não foi possível ler {}: {e}", path.display()),
    },
  }
  Ok(())
}

fn media_type(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase);
  match ext.as_deref() {
    Some("jpg" | "jpeg") => "image/jpeg",
    Some("png") => "image/png",
    Some("gif") => "image/gif",
    Some("webp") => "image/webp",
    _ => "application/octet-stream",
  }
}

#[cfg(test)]
mod tests {
  use std::{sync::Arc, time::Duration};

  use safesteps_app::{
    Adapters,
    sim::{MemoryStorage, Simulated, SimulatedAuth, SimulatedGeolocation, SimulatedRecognizer, SpeechLog},
  };
  use safesteps_core::{
    clock::{Clock, FixedClock},
    navigation::Screen,
    position::Position,
  };

  use super::*;

  async fn app() -> App<Simulated<MemoryStorage>> {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::at_millis(1_715_342_400_000));
    let adapters = Adapters {
      storage:     Arc::new(MemoryStorage::default()),
      geolocation: SimulatedGeolocation::new(Position::new(-23.5, -46.6, 0), clock.clone()),
      auth:        SimulatedAuth::new(Duration::ZERO, Duration::ZERO, clock.clone()),
      recognizer:  SimulatedRecognizer::scripted(Duration::ZERO, ["ajuda"]),
      speech:      SpeechLog::default(),
      clock,
      locale:      "pt-BR".into(),
    };
    App::load(adapters).await.unwrap().0
  }

  async fn run_line(app: &mut App<Simulated<MemoryStorage>>, line: &str) -> safesteps_app::Result<()> {
    execute(app, command::parse(line).unwrap().unwrap()).await
  }

  #[tokio::test]
  async fn scripted_session() {
    let mut app = app().await;
    run_line(&mut app, "accept").await.unwrap();
    run_line(&mut app, "login ana segredo").await.unwrap();
    assert_eq!(app.screen(), Screen::Main);

    let err = run_line(&mut app, "save Casa").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    run_line(&mut app, "locate").await.unwrap();
    run_line(&mut app, "save \"Casa da Vó\"").await.unwrap();
    assert_eq!(app.saved_locations()[0].name, "Casa da Vó");

    run_line(&mut app, "dismiss").await.unwrap();
    assert_eq!(app.tracker().error(), None);

    run_line(&mut app, "voice").await.unwrap();
    run_line(&mut app, "listen").await.unwrap();
    assert!(app.assistant().message().starts_with("Você pode pedir para"));
    run_line(&mut app, "back").await.unwrap();
    assert_eq!(app.screen(), Screen::Main);
  }

  #[test]
  fn photo_media_type_follows_extension() {
    assert_eq!(media_type(Path::new("eu.JPG")), "image/jpeg");
    assert_eq!(media_type(Path::new("/tmp/eu.webp")), "image/webp");
    assert_eq!(media_type(Path::new("notas.txt")), "application/octet-stream");
    assert_eq!(media_type(Path::new("sem-extensao")), "application/octet-stream");
  }
}
