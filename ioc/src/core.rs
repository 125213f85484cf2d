//! Core, non-public pieces shared by the resolution paths.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashSet;

/// An RAII guard to detect circular dependencies.
///
/// When entered, it adds an identifier to the container's resolving set. If
/// the identifier is already there, something on the current resolution path
/// depends on itself and entering fails. Dropping the guard removes the
/// identifier again, on success and on error alike.
pub(crate) struct ResolutionGuard<'a> {
  resolving: &'a RefCell<HashSet<String>>,
  id: String,
}

impl<'a> ResolutionGuard<'a> {
  pub(crate) fn enter(resolving: &'a RefCell<HashSet<String>>, id: &str) -> Result<Self> {
    // `insert` returns `false` if the value was already present.
    if !resolving.borrow_mut().insert(id.to_owned()) {
      tracing::debug!(id, "circular dependency");
      return Err(Error::CircularDependency(id.to_owned()));
    }
    Ok(Self {
      resolving,
      id: id.to_owned(),
    })
  }
}

impl Drop for ResolutionGuard<'_> {
  fn drop(&mut self) {
    self.resolving.borrow_mut().remove(&self.id);
  }
}
