//! Declarative bindings loaded from YAML.
//!
//! ```yaml
//! discovery: name_similarity
//! bindings:
//!   Iface:
//!     implementation: Impl
//!   Impl:
//!     implementation: Impl
//!     arguments:
//!       x: X
//! ```

use crate::binding::Binding;
use crate::discovery::Discovery;
use crate::error::{Error, Result};
use crate::value::{ExtraArguments, Value};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

// --- Top Level Config ---
#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ContainerConfig {
  /// Left unset, the builder keeps whatever strategy it already has.
  #[serde(default)]
  pub discovery: Option<Discovery>,
  #[serde(default)] // Bindings can be empty
  pub bindings: HashMap<String, BindingConfig>,
}

// --- Binding Config ---
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
  pub implementation: String,
  /// Named overrides. Omitting the key and writing an empty map are not the
  /// same: bindings only alias each other when their overrides match exactly.
  #[serde(default)]
  pub arguments: Option<BTreeMap<String, Option<ScalarConfig>>>,
}

/// A literal argument. `~`/`null` deserializes as the surrounding `None`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum ScalarConfig {
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
}

impl From<ScalarConfig> for Value {
  fn from(value: ScalarConfig) -> Self {
    match value {
      ScalarConfig::Bool(b) => Value::Bool(b),
      ScalarConfig::Int(i) => Value::Int(i),
      ScalarConfig::Float(x) => Value::Float(x),
      ScalarConfig::Str(s) => Value::Str(s),
    }
  }
}

impl ContainerConfig {
  pub fn from_yaml_str(source: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(source)?)
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading container configuration");
    let source = std::fs::read_to_string(path)?;
    Self::from_yaml_str(&source)
  }

  /// The configured bindings, ready to seed a container.
  pub fn into_bindings(self) -> Vec<(String, Binding)> {
    self
      .bindings
      .into_iter()
      .map(|(id, config)| (id, config.into_binding()))
      .collect()
  }
}

impl BindingConfig {
  fn into_binding(self) -> Binding {
    match self.arguments {
      Some(arguments) => {
        let arguments: ExtraArguments = arguments
          .into_iter()
          .map(|(name, value)| (name, value.map_or(Value::Null, Value::from)))
          .collect();
        Binding::with_arguments(self.implementation, arguments)
      }
      None => Binding::new(self.implementation),
    }
  }
}
