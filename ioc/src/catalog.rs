//! The type catalog: explicit descriptors standing in for runtime reflection.
//!
//! Every type the container can build is described up front: its name, whether
//! it is abstract, which abstractions it implements, its constructor
//! parameters, and a constructor closure. Types can be registered eagerly or
//! lazily; lazily registered types stay invisible to discovery scans until
//! they are named directly or the catalog is expanded.

use crate::error::{Error, Result};
use crate::value::{Instance, Value};
use std::any::{type_name, Any};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

type Constructor = Rc<dyn Fn(&Arguments) -> Result<Instance>>;

// --- Parameters ---

/// One declared constructor parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
  name: String,
  class: Option<String>,
  default: Option<Value>,
  nullable: bool,
}

impl Parameter {
  /// An untyped (or primitive-typed) parameter.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      class: None,
      default: None,
      nullable: false,
    }
  }

  /// Declares the parameter's class type, by identifier.
  pub fn typed(mut self, class: impl Into<String>) -> Self {
    self.class = Some(class.into());
    self
  }

  /// Declares the parameter's class type as `T`, using `type_name::<T>()` as the identifier.
  pub fn typed_as<T: ?Sized + Any>(self) -> Self {
    self.typed(type_name::<T>())
  }

  pub fn with_default(mut self, value: impl Into<Value>) -> Self {
    self.default = Some(value.into());
    self
  }

  pub fn nullable(mut self) -> Self {
    self.nullable = true;
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn class(&self) -> Option<&str> {
    self.class.as_deref()
  }

  pub fn default_value(&self) -> Option<&Value> {
    self.default.as_ref()
  }

  pub fn is_nullable(&self) -> bool {
    self.nullable
  }
}

// --- Arguments ---

/// The resolved arguments handed to a constructor, in declaration order.
#[derive(Debug, Default)]
pub struct Arguments {
  values: Vec<(String, Value)>,
}

impl Arguments {
  pub(crate) fn with_capacity(capacity: usize) -> Self {
    Self {
      values: Vec::with_capacity(capacity),
    }
  }

  pub(crate) fn push(&mut self, name: &str, value: Value) {
    self.values.push((name.to_owned(), value));
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.values.iter().map(|(name, value)| (name.as_str(), value))
  }

  pub fn value(&self, name: &str) -> Result<&Value> {
    self
      .values
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, value)| value)
      .ok_or_else(|| Error::argument(name, "no such parameter"))
  }

  /// The argument as a shared `T`. Fails on null, on literals and on instances of another type.
  pub fn instance<T: Any>(&self, name: &str) -> Result<Rc<T>> {
    self
      .optional_instance(name)?
      .ok_or_else(|| Error::argument(name, format!("expected {}, got null", type_name::<T>())))
  }

  /// Like [`Arguments::instance`], but maps null to `None`.
  pub fn optional_instance<T: Any>(&self, name: &str) -> Result<Option<Rc<T>>> {
    match self.value(name)? {
      Value::Null => Ok(None),
      Value::Instance(instance) => Rc::clone(instance)
        .downcast::<T>()
        .map(Some)
        .map_err(|_| {
          Error::argument(
            name,
            format!("instance is not a {}", type_name::<T>()),
          )
        }),
      other => Err(Error::argument(
        name,
        format!("expected {}, got {}", type_name::<T>(), other.type_label()),
      )),
    }
  }

  pub fn string(&self, name: &str) -> Result<String> {
    match self.value(name)? {
      Value::Str(s) => Ok(s.clone()),
      other => Err(Error::argument(
        name,
        format!("expected string, got {}", other.type_label()),
      )),
    }
  }

  pub fn optional_string(&self, name: &str) -> Result<Option<String>> {
    match self.value(name)? {
      Value::Null => Ok(None),
      _ => self.string(name).map(Some),
    }
  }

  pub fn int(&self, name: &str) -> Result<i64> {
    match self.value(name)? {
      Value::Int(i) => Ok(*i),
      other => Err(Error::argument(
        name,
        format!("expected int, got {}", other.type_label()),
      )),
    }
  }

  /// Accepts ints as well, widening them.
  pub fn float(&self, name: &str) -> Result<f64> {
    match self.value(name)? {
      Value::Float(x) => Ok(*x),
      Value::Int(i) => Ok(*i as f64),
      other => Err(Error::argument(
        name,
        format!("expected float, got {}", other.type_label()),
      )),
    }
  }

  pub fn bool(&self, name: &str) -> Result<bool> {
    match self.value(name)? {
      Value::Bool(b) => Ok(*b),
      other => Err(Error::argument(
        name,
        format!("expected bool, got {}", other.type_label()),
      )),
    }
  }
}

// --- Type descriptors ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeKind {
  Abstract,
  Concrete,
}

/// Everything the container knows about one type.
pub struct TypeDescriptor {
  name: String,
  kind: TypeKind,
  supertypes: Vec<String>,
  parameters: Vec<Parameter>,
  constructor: Option<Constructor>,
}

impl TypeDescriptor {
  /// An interface or abstract type. It can be bound to, discovered for, and
  /// required by parameters, but never constructed.
  pub fn abstraction(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: TypeKind::Abstract,
      supertypes: Vec::new(),
      parameters: Vec::new(),
      constructor: None,
    }
  }

  /// A concrete type built by `constructor` from its resolved arguments.
  pub fn concrete<T, F>(name: impl Into<String>, constructor: F) -> Self
  where
    T: Any,
    F: Fn(&Arguments) -> Result<T> + 'static,
  {
    Self {
      name: name.into(),
      kind: TypeKind::Concrete,
      supertypes: Vec::new(),
      parameters: Vec::new(),
      constructor: Some(Rc::new(move |args: &Arguments| {
        constructor(args).map(|value| Rc::new(value) as Instance)
      })),
    }
  }

  /// A concrete `T` registered under `type_name::<T>()`.
  pub fn of<T, F>(constructor: F) -> Self
  where
    T: Any,
    F: Fn(&Arguments) -> Result<T> + 'static,
  {
    Self::concrete(type_name::<T>(), constructor)
  }

  /// Declares that this type implements (or extends) `supertype`.
  pub fn implements(mut self, supertype: impl Into<String>) -> Self {
    self.supertypes.push(supertype.into());
    self
  }

  /// Appends a constructor parameter. Declaration order is resolution order.
  pub fn param(mut self, parameter: Parameter) -> Self {
    self.parameters.push(parameter);
    self
  }

  /// A concrete type whose constructor is not accessible to the container.
  pub fn non_instantiable(mut self) -> Self {
    self.constructor = None;
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_abstract(&self) -> bool {
    self.kind == TypeKind::Abstract
  }

  pub fn is_instantiable(&self) -> bool {
    self.kind == TypeKind::Concrete && self.constructor.is_some()
  }

  pub fn supertypes(&self) -> &[String] {
    &self.supertypes
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub(crate) fn construct(&self, arguments: &Arguments) -> Result<Instance> {
    match &self.constructor {
      Some(constructor) => constructor(arguments),
      None => Err(Error::NotInstantiable(self.name.clone())),
    }
  }
}

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDescriptor")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("supertypes", &self.supertypes)
      .field("parameters", &self.parameters)
      .field("instantiable", &self.is_instantiable())
      .finish()
  }
}

// --- Catalog ---

/// The set of types the container may construct or discover.
#[derive(Default)]
pub struct Catalog {
  types: HashMap<String, Rc<TypeDescriptor>>,
  // Loaded types in load order; discovery scans these and ties go to the earliest.
  loaded: Vec<Rc<TypeDescriptor>>,
  pending: Vec<String>,
  expanded: bool,
}

impl Catalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style [`Catalog::register`].
  pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
    self.register(descriptor);
    self
  }

  /// Builder-style [`Catalog::register_lazy`].
  pub fn with_lazy(mut self, descriptor: TypeDescriptor) -> Self {
    self.register_lazy(descriptor);
    self
  }

  /// Registers a type and loads it immediately. Re-registering a name replaces the old descriptor.
  pub fn register(&mut self, descriptor: TypeDescriptor) {
    let descriptor = Rc::new(descriptor);
    self.forget(descriptor.name());
    self.loaded.push(Rc::clone(&descriptor));
    self.types.insert(descriptor.name().to_owned(), descriptor);
  }

  /// Registers a type without loading it. It is loaded the first time it is
  /// looked up by name, or when the catalog is expanded.
  pub fn register_lazy(&mut self, descriptor: TypeDescriptor) {
    let name = descriptor.name().to_owned();
    self.forget(&name);
    self.pending.push(name.clone());
    self.types.insert(name, Rc::new(descriptor));
  }

  fn forget(&mut self, name: &str) {
    self.loaded.retain(|d| d.name() != name);
    self.pending.retain(|n| n != name);
  }

  pub fn contains(&self, name: &str) -> bool {
    self.types.contains_key(name)
  }

  pub fn is_loaded(&self, name: &str) -> bool {
    self.loaded.iter().any(|d| d.name() == name)
  }

  pub fn is_expanded(&self) -> bool {
    self.expanded
  }

  /// Looks a type up by name, loading it if it was registered lazily.
  pub fn load(&mut self, name: &str) -> Option<Rc<TypeDescriptor>> {
    let descriptor = Rc::clone(self.types.get(name)?);
    if let Some(position) = self.pending.iter().position(|n| n == name) {
      tracing::trace!(name, "loading lazily registered type");
      self.pending.remove(position);
      self.loaded.push(Rc::clone(&descriptor));
    }
    Some(descriptor)
  }

  /// Snapshot of the loaded types, in load order.
  pub fn loaded(&self) -> Vec<Rc<TypeDescriptor>> {
    self.loaded.clone()
  }

  /// Whether `candidate` implements `abstraction`, directly or through its
  /// supertypes. A type is not its own subtype. Supertypes registered lazily
  /// get loaded along the way.
  pub fn is_subtype_of(&mut self, candidate: &TypeDescriptor, abstraction: &str) -> bool {
    let mut queue: Vec<String> = candidate.supertypes().to_vec();
    let mut seen: HashSet<String> = HashSet::new();
    while let Some(name) = queue.pop() {
      if name == abstraction {
        return true;
      }
      if !seen.insert(name.clone()) {
        continue;
      }
      if let Some(parent) = self.load(&name) {
        queue.extend(parent.supertypes().iter().cloned());
      }
    }
    false
  }

  /// Loads every pending type. Only the first call does anything; returns
  /// whether this call was that first one.
  pub fn expand(&mut self) -> bool {
    if self.expanded {
      return false;
    }
    self.expanded = true;
    let pending = std::mem::take(&mut self.pending);
    tracing::debug!(count = pending.len(), "expanding catalog");
    for name in pending {
      if let Some(descriptor) = self.types.get(&name) {
        self.loaded.push(Rc::clone(descriptor));
      }
    }
    true
  }
}

impl fmt::Debug for Catalog {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Catalog")
      .field("types", &self.types.len())
      .field("loaded", &self.loaded.len())
      .field("pending", &self.pending)
      .field("expanded", &self.expanded)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lazy_types_load_on_lookup() {
    let mut catalog = Catalog::new().with_lazy(TypeDescriptor::abstraction("Lazy"));
    assert!(catalog.contains("Lazy"));
    assert!(!catalog.is_loaded("Lazy"));

    assert!(catalog.load("Lazy").is_some());
    assert!(catalog.is_loaded("Lazy"));
  }

  #[test]
  fn subtype_check_is_transitive_and_strict() {
    let mut catalog = Catalog::new()
      .with(TypeDescriptor::abstraction("Base"))
      .with(TypeDescriptor::abstraction("Middle").implements("Base"));
    let leaf = TypeDescriptor::concrete("Leaf", |_| Ok(())).implements("Middle");

    assert!(catalog.is_subtype_of(&leaf, "Middle"));
    assert!(catalog.is_subtype_of(&leaf, "Base"));
    assert!(!catalog.is_subtype_of(&leaf, "Leaf"));
  }

  #[test]
  fn expand_runs_once() {
    let mut catalog = Catalog::new().with_lazy(TypeDescriptor::concrete("Late", |_| Ok(1_u8)));

    assert!(catalog.expand());
    assert!(catalog.is_loaded("Late"));
    assert!(!catalog.expand());
  }

  #[test]
  fn argument_accessors_report_mismatches() {
    let mut args = Arguments::default();
    args.push("name", Value::from("fibre"));
    args.push("count", Value::from(3));
    args.push("maybe", Value::Null);

    assert_eq!(args.string("name").unwrap(), "fibre");
    assert_eq!(args.float("count").unwrap(), 3.0);
    assert!(args.optional_instance::<String>("maybe").unwrap().is_none());
    assert!(matches!(args.int("name"), Err(Error::Argument { .. })));
    assert!(matches!(args.value("missing"), Err(Error::Argument { .. })));
  }
}
