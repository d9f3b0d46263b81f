//! Plain-text rendering of app state for the shell.

use safesteps_app::{App, Platform};
use safesteps_core::{
  navigation::Screen,
  notice::{Notice, NoticeLevel},
  position::Position,
  preferences::Language,
};

const TERMS: &str = "\
Termos de Segurança e Privacidade
  · Localização, ocorrências, preferências e perfil ficam armazenados localmente.
  · Este aplicativo não é um serviço oficial de emergência.
  · Em caso de emergência real, ligue para 190 (Polícia) ou 192 (SAMU).
  · A precisão da localização depende do GPS do dispositivo.
Digite 'accept' para aceitar ou 'decline' para recusar.";

pub fn notices(notices: &[Notice]) {
  for notice in notices {
    let mark = match notice.level {
      NoticeLevel::Success => "✓",
      NoticeLevel::Info => "ℹ",
      NoticeLevel::Error => "✗",
    };
    println!("{mark} {}", notice.message);
  }
}

pub fn position(position: &Position) -> String {
  let accuracy = position
    .accuracy
    .map(|a| format!(" ±{a:.0} m"))
    .unwrap_or_default();
  let time = position
    .captured_at()
    .map(|t| t.format("%H:%M:%S").to_string())
    .unwrap_or_default();
  format!(
    "{}{accuracy} · velocidade {} · {time}",
    position.coordinates(),
    position.speed_kmh(),
  )
}

/// Describe the current screen.
pub fn screen<P: Platform>(app: &App<P>) {
  match app.screen() {
    Screen::Terms => println!("{TERMS}"),
    Screen::Login => {
      println!("── Entrar ──");
      println!("login <usuário> <senha> · biometric <facial|digital> · register");
    }
    Screen::Register => {
      println!("── Cadastro ──");
      println!(
        "register email=… password=… confirm=… gender=… language=… [biometric=…] \
         [address=…] terms=yes · back"
      );
      println!("{}", language_choices());
    }
    Screen::Main => main(app),
    Screen::Profile => profile(app),
    Screen::Settings => settings(app),
    Screen::VoiceMode => {
      println!("── Modo Voz ──");
      println!("{}", app.assistant().message());
      println!("listen · emergency · back");
    }
  }
}

/// The registration language list: the common codes first, then the rest.
fn language_choices() -> String {
  let common = Language::COMMON.map(|l| l.to_string()).join(" ");
  let more = Language::all()
    .filter(|l| !Language::COMMON.contains(l))
    .map(|l| l.to_string())
    .collect::<Vec<_>>()
    .join(" ");
  format!("idiomas: {common} · mais idiomas: {more}")
}

fn main<P: Platform>(app: &App<P>) {
  println!("── SafeSteps ──");
  match app.position() {
    Some(p) => println!("posição: {}", position(p)),
    None => println!("posição: desconhecida"),
  }
  if let Some(error) = app.tracker().error() {
    println!("erro: {error}");
  }
  if let Some(id) = app.tracker().active_watch() {
    println!("rastreamento contínuo ativo ({id})");
  }
  println!("locais salvos: {}", app.saved_locations().len());
  for station in app.police_stations() {
    println!("delegacia: {} ({})", station.name, station.distance);
  }
}

fn profile<P: Platform>(app: &App<P>) {
  let prefs = app.preferences();
  println!("── Perfil ──");
  println!("e-mail: {}", prefs.email.as_deref().unwrap_or("-"));
  println!("gênero: {}", prefs.gender);
  println!("endereço: {}", prefs.home_address.as_deref().unwrap_or("-"));
  println!("foto: {}", if prefs.photo.is_some() { "definida" } else { "-" });
  println!("deficiência visual: {}", yes_no(prefs.visually_impaired));
  println!("mostrar delegacias: {}", yes_no(prefs.show_police_stations));
}

fn settings<P: Platform>(app: &App<P>) {
  let prefs = app.preferences();
  println!("── Configurações ──");
  println!("idioma: {}", prefs.language);
  println!("voz: {}", prefs.voice.label());
}

pub fn locations<P: Platform>(app: &App<P>) {
  if app.saved_locations().is_empty() {
    println!("nenhum local salvo");
  }
  for l in app.saved_locations() {
    println!("{}  {}  {:.6}, {:.6}", l.id, l.name, l.latitude, l.longitude);
  }
}

pub fn occurrences<P: Platform>(app: &App<P>) {
  if app.occurrences().is_empty() {
    println!("nenhuma ocorrência registrada");
  }
  for o in app.occurrences() {
    println!(
      "#{}  {}  {} {}  {}",
      o.short_id(),
      o.kind,
      o.display_date(),
      o.time,
      o.address
    );
  }
}

fn yes_no(flag: bool) -> &'static str { if flag { "sim" } else { "não" } }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn registration_lists_common_languages_first() {
    let line = language_choices();
    assert!(line.starts_with("idiomas: pt en de · mais idiomas: es fr "));
    assert!(line.ends_with(" id"));
    assert_eq!(line.matches(" pt ").count(), 1);
    let codes = line
      .split(' ')
      .filter(|w| w.len() == 2 && w.chars().all(|c| c.is_ascii_lowercase()))
      .count();
    assert_eq!(codes, Language::all().count());
  }
}
