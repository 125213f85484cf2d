//! Bindings, the table that owns them, and the alias chain walker.

use crate::value::{ExtraArguments, Instance};
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

/// A table entry: where an identifier points, with which argument overrides,
/// and the instance it resolved to (once it has).
///
/// Bindings are handed around as `Rc<Binding>` so that one binding can sit
/// under several identifiers; those identifiers then share its instance from
/// the start.
pub struct Binding {
  implementation: String,
  extra_arguments: Option<ExtraArguments>,
  instance: OnceCell<Instance>,
}

impl Binding {
  /// A binding to `implementation` without overrides.
  pub fn new(implementation: impl Into<String>) -> Self {
    Self {
      implementation: implementation.into(),
      extra_arguments: None,
      instance: OnceCell::new(),
    }
  }

  /// A binding whose target is constructed with the given overrides.
  pub fn with_arguments(implementation: impl Into<String>, extra_arguments: ExtraArguments) -> Self {
    Self {
      implementation: implementation.into(),
      extra_arguments: Some(extra_arguments),
      instance: OnceCell::new(),
    }
  }

  /// A binding that already carries its instance.
  pub fn with_instance(implementation: impl Into<String>, instance: Instance) -> Self {
    Self {
      implementation: implementation.into(),
      extra_arguments: None,
      instance: OnceCell::with_value(instance),
    }
  }

  pub fn implementation(&self) -> &str {
    &self.implementation
  }

  pub fn extra_arguments(&self) -> Option<&ExtraArguments> {
    self.extra_arguments.as_ref()
  }

  pub fn instance(&self) -> Option<Instance> {
    self.instance.get().cloned()
  }

  pub fn has_instance(&self) -> bool {
    self.instance.get().is_some()
  }

  // First write wins; a cached instance is never replaced.
  pub(crate) fn share(&self, instance: &Instance) {
    let _ = self.instance.set(Rc::clone(instance));
  }
}

impl fmt::Debug for Binding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Binding")
      .field("implementation", &self.implementation)
      .field("extra_arguments", &self.extra_arguments)
      .field("has_instance", &self.has_instance())
      .finish()
  }
}

/// Identifier → binding map owned by a container.
#[derive(Default)]
pub(crate) struct BindingTable {
  entries: HashMap<String, Rc<Binding>>,
}

impl BindingTable {
  pub(crate) fn get(&self, id: &str) -> Option<&Rc<Binding>> {
    self.entries.get(id)
  }

  pub(crate) fn contains(&self, id: &str) -> bool {
    self.entries.contains_key(id)
  }

  pub(crate) fn insert(&mut self, id: impl Into<String>, binding: Rc<Binding>) {
    self.entries.insert(id.into(), binding);
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }

  pub(crate) fn snapshot(&self) -> HashMap<String, Rc<Binding>> {
    self.entries.clone()
  }

  /// Iterates the bindings reachable from `start` (excluding `start` itself).
  pub(crate) fn chain<'a>(&'a self, start: &Rc<Binding>) -> AliasChain<'a> {
    let mut visited = HashSet::new();
    visited.insert(Rc::as_ptr(start));
    AliasChain {
      table: self,
      current: Some(Rc::clone(start)),
      visited,
    }
  }

  /// The first binding on the chain that already holds an instance, or the
  /// last reachable one. Returns `start` when the chain is empty.
  pub(crate) fn first_binding_with_instance(&self, start: &Rc<Binding>) -> Rc<Binding> {
    let mut last = Rc::clone(start);
    for binding in self.chain(start) {
      last = binding;
      if last.has_instance() {
        break;
      }
    }
    last
  }

  /// Stores `instance` into `start` and every binding on its chain.
  pub(crate) fn share_instance(&self, start: &Rc<Binding>, instance: &Instance) {
    start.share(instance);
    for binding in self.chain(start) {
      binding.share(instance);
    }
  }
}

/// Walks `implementation` pointers while the override maps stay equal.
///
/// Stops when the next identifier is unbound, when the next binding was
/// configured with different overrides, or when the next binding was already
/// visited (a binding mapped to itself, or a longer alias loop).
pub(crate) struct AliasChain<'a> {
  table: &'a BindingTable,
  current: Option<Rc<Binding>>,
  visited: HashSet<*const Binding>,
}

impl<'a> Iterator for AliasChain<'a> {
  type Item = Rc<Binding>;

  fn next(&mut self) -> Option<Self::Item> {
    let current = self.current.take()?;
    let next = self.table.get(current.implementation())?;
    if next.extra_arguments() != current.extra_arguments() {
      return None;
    }
    if !self.visited.insert(Rc::as_ptr(next)) {
      tracing::trace!(id = current.implementation(), "alias loop, stopping walk");
      return None;
    }
    tracing::trace!(
      from = current.implementation(),
      to = next.implementation(),
      "following alias"
    );
    self.current = Some(Rc::clone(next));
    Some(Rc::clone(next))
  }
}
