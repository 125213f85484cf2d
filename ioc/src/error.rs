use thiserror::Error;

/// The main error type for `fibre_autowire`.
#[derive(Debug, Error)]
pub enum Error {
  /// An abstract type was requested and no concrete implementation could be determined.
  #[error("Could not find implementation for abstraction: {0}")]
  BindingNotFound(String),

  /// The identifier names nothing the catalog knows about.
  #[error("Type does not exist in the catalog: {0}")]
  UnknownType(String),

  /// The type is known and concrete, but has no usable constructor.
  #[error("Type is not instantiable: {0}")]
  NotInstantiable(String),

  #[error("Could not parse parameter: {parameter}")]
  ParameterResolution {
    parameter: String,
    #[source]
    source: Option<Box<Error>>,
  },

  /// A constructor asked for an argument it could not use.
  #[error("Invalid argument '{name}': {reason}")]
  Argument { name: String, reason: String },

  /// A constructor rejected its arguments.
  #[error("Construction failed: {0}")]
  Construction(String),

  /// The instance resolved for `id` is not of the requested Rust type.
  #[error("Instance bound to '{id}' is not a {expected}")]
  TypeMismatch { id: String, expected: &'static str },

  #[error("Circular dependency detected while resolving: {0}")]
  CircularDependency(String),

  /// Any failure raised while building `implementation`, with the underlying error attached.
  #[error("{source}; Implementation: {implementation}")]
  Resolution {
    implementation: String,
    #[source]
    source: Box<Error>,
  },

  #[error("Failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(#[from] serde_yaml::Error),
}

/// The coarse classification callers usually branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  BindingNotFound,
  ParameterResolution,
  Resolution,
  Config,
}

impl Error {
  /// Classifies the error. `Resolution` wrappers are looked through, so a
  /// missing abstraction deep inside `create` still reports `BindingNotFound`.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::BindingNotFound(_) | Error::UnknownType(_) => ErrorKind::BindingNotFound,
      Error::ParameterResolution { .. } => ErrorKind::ParameterResolution,
      Error::Resolution { source, .. } => source.kind(),
      Error::ConfigRead(_) | Error::ConfigParse(_) => ErrorKind::Config,
      Error::NotInstantiable(_)
      | Error::Argument { .. }
      | Error::Construction(_)
      | Error::TypeMismatch { .. }
      | Error::CircularDependency(_) => ErrorKind::Resolution,
    }
  }

  /// Follows `Resolution` wrappers and parameter causes down to the first
  /// failure that was not itself caused by another container error.
  pub fn root_cause(&self) -> &Error {
    match self {
      Error::Resolution { source, .. } => source.root_cause(),
      Error::ParameterResolution {
        source: Some(source),
        ..
      } => source.root_cause(),
      other => other,
    }
  }

  pub(crate) fn wrap(implementation: &str, source: Error) -> Self {
    Error::Resolution {
      implementation: implementation.to_owned(),
      source: Box::new(source),
    }
  }

  pub(crate) fn argument(name: &str, reason: impl Into<String>) -> Self {
    Error::Argument {
      name: name.to_owned(),
      reason: reason.into(),
    }
  }
}

/// A specialized `Result` type for `fibre_autowire` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
