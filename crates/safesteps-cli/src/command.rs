//! Parsing of shell input lines into [`Command`]s.
//!
//! Arguments are whitespace-separated; double quotes group words. Forms are
//! entered as `key=value` pairs.

use std::{path::PathBuf, str::FromStr};

use safesteps_core::{
  auth::{BiometricKind, Credentials, RegistrationForm},
  occurrence::{OccurrenceForm, OccurrenceKind},
  preferences::{PasswordChange, Voice},
};
use thiserror::Error;

#[derive(Debug, Clone)]
pub enum Command {
  Status,
  Accept,
  Decline,
  Login(Credentials),
  Biometric(BiometricKind),
  OpenRegister,
  Register(RegistrationForm),
  Back,
  Profile,
  Settings,
  Voice,
  Listen,
  Emergency,
  Locate,
  Track,
  Dismiss,
  Save(String),
  Delete(String),
  Goto(String),
  Locations,
  Report(OccurrenceForm),
  Occurrences,
  Set(Setting),
  Password(PasswordChange),
  Address(String),
  Photo(PathBuf),
  Logout,
  Help,
  Quit,
}

/// A preference changed with `set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
  VisuallyImpaired(bool),
  PoliceStations(bool),
  /// Kept as text; the app decides which codes it offers.
  Language(String),
  Voice(Voice),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("comando desconhecido: {0} (digite 'help')")]
  Unknown(String),

  #[error("uso: {0}")]
  Usage(&'static str),

  #[error("valor inválido para {field}: {value:?}")]
  BadValue { field: &'static str, value: String },

  #[error("campo desconhecido: {0}")]
  UnknownField(String),

  #[error("aspas não fechadas")]
  UnclosedQuote,
}

pub const HELP: &str = "\
comandos:
  status                          mostra a tela atual
  accept | decline                aceita ou recusa os termos
  login <usuário> <senha>         entra com senha
  biometric <facial|digital>      entra com biometria
  register                        abre o cadastro
  register email=… password=… confirm=… gender=… language=… [biometric=…] [address=…] terms=yes
  back                            volta para a tela anterior
  profile | settings              abre o perfil ou as configurações
  voice | listen | emergency      modo voz, ouvir comando, chamar 190
  locate | track                  localização atual, rastreamento contínuo
  dismiss                         descarta o erro de localização
  save <nome>                     salva a posição atual
  delete <id> | goto <id>         remove ou mostra um local salvo
  locations | occurrences         lista locais ou ocorrências
  report type=… [custom=…] address=… date=AAAA-MM-DD time=HH:MM
  set visually-impaired|police-stations on|off
  set language <código> | set voice <female-1|female-2|male-1|male-2>
  password <atual> <nova> <confirmação>
  address <endereço> | photo <arquivo>
  logout | help | quit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
  let words = split(line)?;
  let Some((name, args)) = words.split_first() else {
    return Ok(None);
  };

  let command = match name.to_lowercase().as_str() {
    "status" => Command::Status,
    "accept" => Command::Accept,
    "decline" => Command::Decline,
    "login" => match args {
      [username, password] => Command::Login(Credentials {
        username: username.clone(),
        password: password.clone(),
      }),
      _ => return Err(ParseError::Usage("login <usuário> <senha>")),
    },
    "biometric" => match args {
      [kind] => Command::Biometric(value("biometric", kind)?),
      _ => return Err(ParseError::Usage("biometric <facial|digital>")),
    },
    "register" if args.is_empty() => Command::OpenRegister,
    "register" => Command::Register(registration(args)?),
    "back" => Command::Back,
    "profile" => Command::Profile,
    "settings" => Command::Settings,
    "voice" => Command::Voice,
    "listen" => Command::Listen,
    "emergency" => Command::Emergency,
    "locate" => Command::Locate,
    "track" => Command::Track,
    "dismiss" => Command::Dismiss,
    "save" => Command::Save(rest(args, "save <nome>")?),
    "delete" => Command::Delete(single(args, "delete <id>")?),
    "goto" => Command::Goto(single(args, "goto <id>")?),
    "locations" => Command::Locations,
    "report" => Command::Report(occurrence(args)?),
    "occurrences" => Command::Occurrences,
    "set" => Command::Set(setting(args)?),
    "password" => match args {
      [current, new, confirm] => Command::Password(PasswordChange {
        current: current.clone(),
        new:     new.clone(),
        confirm: confirm.clone(),
      }),
      _ => return Err(ParseError::Usage("password <atual> <nova> <confirmação>")),
    },
    "address" => Command::Address(rest(args, "address <endereço>")?),
    "photo" => Command::Photo(PathBuf::from(single(args, "photo <arquivo>")?)),
    "logout" => Command::Logout,
    "help" | "?" => Command::Help,
    "quit" | "exit" => Command::Quit,
    other => return Err(ParseError::Unknown(other.to_string())),
  };
  Ok(Some(command))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn split(line: &str) -> Result<Vec<String>, ParseError> {
  let mut words = Vec::new();
  let mut current = String::new();
  let mut in_word = false;
  let mut quoted = false;

  for c in line.chars() {
    match c {
      '"' => {
        quoted = !quoted;
        in_word = true;
      }
      c if c.is_whitespace() && !quoted => {
        if in_word {
          words.push(std::mem::take(&mut current));
          in_word = false;
        }
      }
      c => {
        current.push(c);
        in_word = true;
      }
    }
  }
  if quoted {
    return Err(ParseError::UnclosedQuote);
  }
  if in_word {
    words.push(current);
  }
  Ok(words)
}

fn single(args: &[String], usage: &'static str) -> Result<String, ParseError> {
  match args {
    [one] => Ok(one.clone()),
    _ => Err(ParseError::Usage(usage)),
  }
}

/// Every remaining word, rejoined with single spaces.
fn rest(args: &[String], usage: &'static str) -> Result<String, ParseError> {
  if args.is_empty() { Err(ParseError::Usage(usage)) } else { Ok(args.join(" ")) }
}

fn value<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ParseError> {
  raw
    .to_lowercase()
    .parse()
    .map_err(|_| ParseError::BadValue { field, value: raw.to_string() })
}

fn flag(field: &'static str, raw: &str) -> Result<bool, ParseError> {
  match raw.to_lowercase().as_str() {
    "on" | "yes" | "true" | "sim" => Ok(true),
    "off" | "no" | "false" | "não" | "nao" => Ok(false),
    _ => Err(ParseError::BadValue { field, value: raw.to_string() }),
  }
}

fn pairs(args: &[String]) -> impl Iterator<Item = Result<(&str, &str), ParseError>> {
  args.iter().map(|arg| {
    arg
      .split_once('=')
      .ok_or_else(|| ParseError::UnknownField(arg.clone()))
  })
}

/// Missing fields are left empty and caught by validation.
fn registration(args: &[String]) -> Result<RegistrationForm, ParseError> {
  let mut form = RegistrationForm::default();
  for pair in pairs(args) {
    let (key, raw) = pair?;
    match key {
      "email" => form.email = raw.to_string(),
      "password" => form.password = raw.to_string(),
      "confirm" => form.confirm_password = raw.to_string(),
      "gender" => form.gender = Some(value("gender", raw)?),
      "language" => form.language = Some(value("language", raw)?),
      "biometric" => form.biometric = Some(value("biometric", raw)?),
      "address" => form.home_address = Some(raw.to_string()),
      "terms" => form.accepted_terms = flag("terms", raw)?,
      other => return Err(ParseError::UnknownField(other.to_string())),
    }
  }
  Ok(form)
}

fn occurrence(args: &[String]) -> Result<OccurrenceForm, ParseError> {
  let mut form = OccurrenceForm::default();
  for pair in pairs(args) {
    let (key, raw) = pair?;
    match key {
      "type" => form.kind = Some(value::<OccurrenceKind>("type", raw)?),
      "custom" => form.custom_type = raw.to_string(),
      "address" => form.address = raw.to_string(),
      "date" => form.date = raw.to_string(),
      "time" => form.time = raw.to_string(),
      other => return Err(ParseError::UnknownField(other.to_string())),
    }
  }
  Ok(form)
}

fn setting(args: &[String]) -> Result<Setting, ParseError> {
  const USAGE: &str = "set <visually-impaired|police-stations|language|voice> <valor>";
  let [key, raw] = args else {
    return Err(ParseError::Usage(USAGE));
  };
  match key.as_str() {
    "visually-impaired" => Ok(Setting::VisuallyImpaired(flag("visually-impaired", raw)?)),
    "police-stations" => Ok(Setting::PoliceStations(flag("police-stations", raw)?)),
    "language" => Ok(Setting::Language(raw.to_lowercase())),
    "voice" => Ok(Setting::Voice(value("voice", raw)?)),
    _ => Err(ParseError::Usage(USAGE)),
  }
}
