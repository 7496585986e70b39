use thiserror::Error;

/// The main error type for the `fibre_wiring` library.
#[derive(Debug, Error)]
pub enum Error {
  /// A factory descriptor was malformed when it was created. The diagnostic is
  /// captured at registration time and reported every time the type is generated.
  #[error("invalid factory descriptor: {reason}")]
  InvalidFactory { reason: String },

  #[error("the referenced type \"@{id}\" has not been defined")]
  UnknownTypeReference { id: String },

  #[error("{subject} (type {actual}) is not assignable to the expected type {expected}")]
  TypeMismatch {
    subject: String,
    actual: String,
    expected: String,
  },

  #[error("the referenced method \"{reference}\" does not exist or is not exported on type {type_name}")]
  MethodNotFound { reference: String, type_name: String },

  #[error("the parameter \"%{name}%\" has not been configured")]
  UndefinedParameter { name: String },

  #[error("the optional reference \"{reference}\" is undefined and {expected} has no zero value")]
  NoZeroValue { reference: String, expected: String },

  #[error("invalid number of arguments for {target}: got {actual} but expected {expected}")]
  Arity {
    target: String,
    expected: String,
    actual: usize,
  },

  #[error("argument {position} of {target} could not be resolved: {source}")]
  Argument {
    target: String,
    position: usize,
    source: Box<Error>,
  },

  #[error("error while generating type \"{id}\": {source}")]
  Generation { id: String, source: Box<Error> },

  #[error("failed to warm up type \"{id}\": {source}")]
  Warmup { id: String, source: Box<Error> },

  #[error("type \"{type_id}\" references unknown type \"{referenced}\"")]
  UndefinedReference { type_id: String, referenced: String },

  #[error("detected circular dependency: {}", .cycle.join(" -> "))]
  CircularDependency { cycle: Vec<String> },

  #[error("failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("failed to parse configuration: {0}")]
  ConfigParse(String),
}

impl Error {
  /// Strips the `Argument`, `Generation` and `Warmup` context layers and returns
  /// the error that started the failure.
  pub fn root_cause(&self) -> &Error {
    let mut current = self;
    loop {
      match current {
        Error::Argument { source, .. }
        | Error::Generation { source, .. }
        | Error::Warmup { source, .. } => current = source,
        _ => return current,
      }
    }
  }

  pub(crate) fn invalid(reason: impl Into<String>) -> Self {
    Error::InvalidFactory {
      reason: reason.into(),
    }
  }
}

/// A specialized `Result` type for `fibre_wiring` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
