//! Error types for `safesteps-core`.
//!
//! [`ValidationError`] carries the user-facing message for every form rule;
//! its `Display` output is what ends up in a notice.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("stored value under {key:?} is malformed: {source}")]
  StorageParse {
    key:    &'static str,
    #[source]
    source: serde_json::Error,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A form field that is missing or invalid. Rules are checked in a fixed
/// order and the first failure is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  // ── Saved locations ─────────────────────────────────────────────────────
  #[error("Nenhuma localização para salvar")]
  NoPosition,
  #[error("Digite um nome para a localização")]
  EmptyLocationName,

  // ── Occurrences ─────────────────────────────────────────────────────────
  #[error("Por favor, selecione o tipo de ocorrência")]
  MissingOccurrenceType,
  #[error("Por favor, descreva o tipo de ocorrência")]
  MissingCustomType,
  #[error("Por favor, informe o endereço")]
  MissingAddress,
  #[error("Por favor, informe a data")]
  MissingDate,
  #[error("Por favor, informe o horário")]
  MissingTime,
  #[error("Data inválida: {0}")]
  InvalidDate(String),
  #[error("A data da ocorrência não pode estar no futuro")]
  FutureDate,
  #[error("Horário inválido: {0}")]
  InvalidTime(String),

  // ── Login ───────────────────────────────────────────────────────────────
  #[error("Por favor, preencha todos os campos")]
  MissingCredentials,

  // ── Registration ────────────────────────────────────────────────────────
  #[error("Por favor, digite seu e-mail")]
  MissingEmail,
  #[error("Por favor, digite um e-mail válido")]
  InvalidEmail,
  #[error("Por favor, digite sua senha")]
  MissingPassword,
  #[error("A senha deve ter no mínimo 6 caracteres")]
  PasswordTooShort,
  #[error("As senhas não coincidem")]
  PasswordMismatch,
  #[error("Por favor, selecione um idioma")]
  MissingLanguage,
  #[error("Por favor, selecione o gênero")]
  MissingGender,
  #[error("Você deve aceitar os termos de segurança")]
  TermsNotAccepted,

  // ── Profile ─────────────────────────────────────────────────────────────
  #[error("Preencha todos os campos de senha")]
  MissingPasswordFields,
  #[error("Digite um endereço válido")]
  EmptyHomeAddress,
  #[error("Formato de imagem não suportado: {0}")]
  InvalidPhoto(String),
  #[error("Idioma não disponível: {0}")]
  UnsupportedLanguage(String),
}
