//! Picking a concrete type for an abstraction nobody bound.
//!
//! This is a heuristic: among the loaded, instantiable subtypes of the
//! abstraction, the one whose short name shares the most characters with the
//! abstraction's short name wins. It is opt-in and makes no promise that the
//! answer is unique or stable as more types get registered.

use crate::catalog::{Catalog, TypeDescriptor};
use serde::Deserialize;
use std::rc::Rc;

/// What a container does when asked to construct an abstract type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discovery {
  /// Fail with `BindingNotFound`.
  #[default]
  Disabled,
  /// Search the catalog for the best-named subtype.
  NameSimilarity,
}

/// Finds the best candidate for `abstraction`, expanding the catalog once if
/// the loaded types hold none.
pub(crate) fn discover(
  catalog: &mut Catalog,
  abstraction: &TypeDescriptor,
) -> Option<Rc<TypeDescriptor>> {
  if let Some(found) = best_candidate(catalog, abstraction) {
    return Some(found);
  }
  if catalog.expand() {
    return best_candidate(catalog, abstraction);
  }
  None
}

fn best_candidate(catalog: &mut Catalog, abstraction: &TypeDescriptor) -> Option<Rc<TypeDescriptor>> {
  let target = short_name(abstraction.name());
  let mut best: Option<(usize, Rc<TypeDescriptor>)> = None;

  for candidate in catalog.loaded() {
    if !candidate.is_instantiable() || !catalog.is_subtype_of(&candidate, abstraction.name()) {
      continue;
    }
    let score = similar_text(target, short_name(candidate.name()));
    tracing::trace!(
      abstraction = abstraction.name(),
      candidate = candidate.name(),
      score,
      "scored discovery candidate"
    );
    let better = best.as_ref().map_or(true, |(best_score, _)| score > *best_score);
    if better {
      best = Some((score, candidate));
    }
  }

  if let Some((score, found)) = &best {
    tracing::debug!(
      abstraction = abstraction.name(),
      implementation = found.name(),
      score,
      "discovered implementation"
    );
  }
  best.map(|(_, found)| found)
}

/// The last path segment of a type name: `app::store::FileStore` → `FileStore`.
///
/// Generic arguments are dropped first, so `alloc::rc::Rc<dyn app::Logger>`
/// shortens to `Rc`.
pub fn short_name(name: &str) -> &str {
  let base = name.split('<').next().unwrap_or(name).trim_end();
  base.rsplit(|c: char| c == ':' || c == '\\').next().unwrap_or(base)
}

/// Number of characters two strings have in common.
///
/// Finds the longest common substring, then recurses into the pieces to its
/// left and to its right. Case-sensitive and byte based.
pub fn similar_text(first: &str, second: &str) -> usize {
  similar_bytes(first.as_bytes(), second.as_bytes())
}

fn similar_bytes(first: &[u8], second: &[u8]) -> usize {
  let (pos1, pos2, max) = longest_common(first, second);
  if max == 0 {
    return 0;
  }
  let mut sum = max;
  if pos1 > 0 && pos2 > 0 {
    sum += similar_bytes(&first[..pos1], &second[..pos2]);
  }
  if pos1 + max < first.len() && pos2 + max < second.len() {
    sum += similar_bytes(&first[pos1 + max..], &second[pos2 + max..]);
  }
  sum
}

// First longest common run, as (start in first, start in second, length).
fn longest_common(first: &[u8], second: &[u8]) -> (usize, usize, usize) {
  let mut best = (0, 0, 0);
  for i in 0..first.len() {
    for j in 0..second.len() {
      let len = first[i..]
        .iter()
        .zip(&second[j..])
        .take_while(|(a, b)| a == b)
        .count();
      if len > best.2 {
        best = (i, j, len);
      }
    }
  }
  best
}
