use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid date type `{0}`. Use one of Daily, Weekly, Monthly or Yearly")]
  InvalidUnit(String),

  #[error("Could not find an item named '{0}' in the default Keychain")]
  CredentialNotFound(String),

  #[error("Keychain access failed: {0}")]
  Keychain(String),

  /// Rejection by the reporting API. Carries the server's own message for 4xx codes.
  #[error("{0}")]
  ApiRejected(String),

  #[error("{0}")]
  Validation(String),

  #[error("Response is missing the `{0}` header")]
  MissingHeader(&'static str),

  #[error(transparent)]
  Reqwest(#[from] reqwest::Error),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Template(#[from] indicatif::style::TemplateError),
}
