//! Values that flow into constructors: literals, nulls and shared instances.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A shared, type-erased object produced by the container.
///
/// Two instances are "the same" when `Rc::ptr_eq` holds.
pub type Instance = Rc<dyn Any>;

/// Named constructor-argument overrides attached to a binding.
pub type ExtraArguments = BTreeMap<String, Value>;

/// A single argument value.
///
/// A `Str` override may double as a reference to another binding: when the
/// receiving parameter is class-typed and the string is a bound identifier,
/// the container resolves the identifier instead of passing the text.
#[derive(Clone)]
pub enum Value {
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  Instance(Instance),
}

impl Value {
  /// Wraps an already constructed object.
  pub fn instance<T: Any>(value: T) -> Self {
    Value::Instance(Rc::new(value))
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(s) => Some(s),
      _ => None,
    }
  }

  pub(crate) fn type_label(&self) -> &'static str {
    match self {
      Value::Null => "null",
      Value::Bool(_) => "bool",
      Value::Int(_) => "int",
      Value::Float(_) => "float",
      Value::Str(_) => "string",
      Value::Instance(_) => "instance",
    }
  }
}

// Scalars compare by value, instances by identity.
impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Null, Value::Null) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Int(a), Value::Int(b)) => a == b,
      (Value::Float(a), Value::Float(b)) => a == b,
      (Value::Str(a), Value::Str(b)) => a == b,
      (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
      _ => false,
    }
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => write!(f, "Null"),
      Value::Bool(b) => write!(f, "Bool({})", b),
      Value::Int(i) => write!(f, "Int({})", i),
      Value::Float(x) => write!(f, "Float({})", x),
      Value::Str(s) => write!(f, "Str({:?})", s),
      Value::Instance(rc) => write!(f, "Instance({:p})", Rc::as_ptr(rc)),
    }
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::Str(value.to_owned())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::Str(value)
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Value::Int(value)
  }
}

impl From<i32> for Value {
  fn from(value: i32) -> Self {
    Value::Int(value.into())
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Float(value)
  }
}

impl From<Instance> for Value {
  fn from(value: Instance) -> Self {
    Value::Instance(value)
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(value: Option<T>) -> Self {
    value.map_or(Value::Null, Into::into)
  }
}
