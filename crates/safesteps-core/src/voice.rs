//! The voice assistant's command table.
//!
//! Input is matched case-insensitively against a small fixed vocabulary; each
//! command maps to a response generator over the current position and the
//! visible police stations. Anything else gets the fallback reply.

use strum::{EnumIter, IntoEnumIterator};

use crate::position::Position;

pub const GREETING: &str = "Olá! Estou aqui para ajudá-lo. Diga 'registrar ocorrência' para \
                            reportar um problema ou 'onde estou' para saber sua localização.";

pub const NOT_UNDERSTOOD: &str = "Desculpe, não entendi. Tente novamente.";

pub const EMERGENCY_MESSAGE: &str = "Ligando para emergência 190...";

pub const EMERGENCY_SPOKEN: &str = "Ligando para emergência 190";

// ─── Points of interest ──────────────────────────────────────────────────────

/// A nearby police station. The list is static; there is no real lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoliceStation {
  pub name:      &'static str,
  pub distance:  &'static str,
  pub latitude:  f64,
  pub longitude: f64,
}

pub const POLICE_STATIONS: [PoliceStation; 2] = [
  PoliceStation {
    name:      "Delegacia da Mulher - Centro",
    distance:  "1.2 km",
    latitude:  -23.550520,
    longitude: -46.633308,
  },
  PoliceStation {
    name:      "Delegacia da Mulher - Zona Sul",
    distance:  "2.5 km",
    latitude:  -23.565520,
    longitude: -46.645308,
  },
];

/// Stations shown to the user, honouring the show-police-stations preference.
pub fn visible_stations(show: bool) -> &'static [PoliceStation] {
  if show { &POLICE_STATIONS } else { &[] }
}

// ─── Commands ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum VoiceCommand {
  RegisterOccurrence,
  WhereAmI,
  NearestStation,
  Help,
}

impl VoiceCommand {
  /// The canonical spoken phrase.
  pub fn phrase(self) -> &'static str {
    match self {
      Self::RegisterOccurrence => "registrar ocorrência",
      Self::WhereAmI => "onde estou",
      Self::NearestStation => "delegacia mais próxima",
      Self::Help => "ajuda",
    }
  }

  /// Match recognised text against the vocabulary.
  pub fn parse(input: &str) -> Option<Self> {
    let normalized = input.trim().to_lowercase();
    Self::iter().find(|c| c.phrase() == normalized)
  }

  /// Every canonical phrase, in table order.
  pub fn vocabulary() -> impl Iterator<Item = &'static str> { Self::iter().map(Self::phrase) }

  /// Build the assistant's reply.
  pub fn respond(self, position: Option<&Position>, stations: &[PoliceStation]) -> String {
    match self {
      Self::RegisterOccurrence => "Vou registrar uma ocorrência. Qual o tipo? Diga: ausência de \
                                   iluminação, rua pouco movimentada, assédio costumeiro, área \
                                   de risco, ou outros."
        .to_string(),
      Self::WhereAmI => match position {
        Some(p) => {
          let nearby = if stations.is_empty() {
            "pontos de ajuda".to_string()
          } else {
            format!("{} delegacias", stations.len())
          };
          format!(
            "Você está em Latitude {:.4} e Longitude {:.4}. Há {nearby} próximos a você.",
            p.latitude, p.longitude
          )
        }
        None => {
          "Não consegui obter sua localização. Verifique as permissões do aplicativo.".to_string()
        }
      },
      Self::NearestStation => match stations.first() {
        Some(s) => format!(
          "A delegacia mais próxima é {}, a {} de distância.",
          s.name, s.distance
        ),
        None => "Buscando pontos de ajuda próximos...".to_string(),
      },
      Self::Help => "Você pode pedir para: registrar ocorrência, saber onde está, encontrar \
                     delegacia mais próxima, ou ligar para emergência."
        .to_string(),
    }
  }
}

/// Map raw recognised text to the assistant's reply.
pub fn dispatch(input: &str, position: Option<&Position>, stations: &[PoliceStation]) -> String {
  match VoiceCommand::parse(input) {
    Some(command) => command.respond(position, stations),
    None => NOT_UNDERSTOOD.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn where_am_i_formats_coordinates() {
    let pos = Position::new(-23.5, -46.6, 1000);
    let reply = dispatch("onde estou", Some(&pos), &[]);
    assert!(reply.contains("-23.5000"), "{reply}");
    assert!(reply.contains("-46.6000"), "{reply}");
    assert!(reply.contains("pontos de ajuda"));
  }

  #[test]
  fn where_am_i_without_position() {
    let reply = dispatch("onde estou", None, &[]);
    assert!(reply.starts_with("Não consegui obter sua localização"));
  }

  #[test]
  fn where_am_i_counts_visible_stations() {
    let pos = Position::new(0.0, 0.0, 0);
    let reply = dispatch("onde estou", Some(&pos), visible_stations(true));
    assert!(reply.contains("2 delegacias"));
  }

  #[test]
  fn nearest_station_depends_on_preference() {
    let shown = dispatch("delegacia mais próxima", None, visible_stations(true));
    assert_eq!(
      shown,
      "A delegacia mais próxima é Delegacia da Mulher - Centro, a 1.2 km de distância."
    );
    let hidden = dispatch("delegacia mais próxima", None, visible_stations(false));
    assert_eq!(hidden, "Buscando pontos de ajuda próximos...");
  }

  #[test]
  fn matching_ignores_case_and_padding() {
    assert_eq!(VoiceCommand::parse("  AJUDA "), Some(VoiceCommand::Help));
    assert_eq!(
      VoiceCommand::parse("Registrar Ocorrência"),
      Some(VoiceCommand::RegisterOccurrence)
    );
  }

  #[test]
  fn unknown_input_falls_back() {
    assert_eq!(dispatch("tocar música", None, &[]), NOT_UNDERSTOOD);
  }

  #[test]
  fn vocabulary_has_four_phrases() {
    let phrases: Vec<_> = VoiceCommand::vocabulary().collect();
    assert_eq!(
      phrases,
      ["registrar ocorrência", "onde estou", "delegacia mais próxima", "ajuda"]
    );
  }
}
