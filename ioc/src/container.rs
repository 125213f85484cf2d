//! The main `Container` struct and its associated methods.

use crate::binding::{Binding, BindingTable};
use crate::catalog::{Catalog, TypeDescriptor};
use crate::config::ContainerConfig;
use crate::core::ResolutionGuard;
use crate::discovery::Discovery;
use crate::error::{Error, Result};
use crate::value::{ExtraArguments, Instance};
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifier under which every container registers itself.
pub const CONTAINER_ID: &str = "fibre_autowire::Container";

/// Identifier of the [`Resolver`] protocol; also bound to the container itself.
pub const RESOLVER_ID: &str = "fibre_autowire::Resolver";

/// The generic container protocol: resolve, test, construct, bind.
pub trait Resolver {
  fn get(&self, id: &str) -> Result<Instance>;
  fn has(&self, id: &str) -> bool;
  fn create(&self, implementation: &str, extra_arguments: Option<&ExtraArguments>) -> Result<Instance>;
  fn bind(&self, id: &str, implementation: &str, extra_arguments: Option<ExtraArguments>);
}

pub(crate) struct Inner {
  pub(crate) bindings: RefCell<BindingTable>,
  pub(crate) catalog: RefCell<Catalog>,
  pub(crate) discovery: Discovery,
  resolving: RefCell<HashSet<String>>,
}

/// A string-keyed dependency-injection container.
///
/// Identifiers are opaque strings; by convention they name types in the
/// container's [`Catalog`]. Every instance the container builds through
/// [`Container::get`] is shared: all identifiers whose alias chains converge
/// on the same binding receive the identical `Rc`.
///
/// `Container` is a cheap handle. Clones refer to the same bindings. It is
/// single-threaded (`!Send`); an embedding that needs to share one across
/// threads must serialize access itself.
#[derive(Clone)]
pub struct Container {
  pub(crate) inner: Rc<Inner>,
}

/// What the container hands out when something asks for the container itself.
///
/// Holds a weak reference so the self-registration does not keep the
/// container alive.
pub struct ContainerHandle {
  inner: Weak<Inner>,
}

impl ContainerHandle {
  /// The container, if it is still alive.
  pub fn upgrade(&self) -> Option<Container> {
    self.inner.upgrade().map(|inner| Container { inner })
  }
}

impl fmt::Debug for ContainerHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContainerHandle")
      .field("alive", &(self.inner.strong_count() > 0))
      .finish()
  }
}

impl Default for Container {
  fn default() -> Self {
    ContainerBuilder::default().build()
  }
}

impl Container {
  /// Creates a container over `catalog` without implementation discovery.
  pub fn new(catalog: Catalog) -> Self {
    Self::builder().catalog(catalog).build()
  }

  /// Creates a container over `catalog` that discovers implementations for
  /// unbound abstractions.
  pub fn failsafe(catalog: Catalog) -> Self {
    Self::builder().catalog(catalog).failsafe().build()
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::default()
  }

  pub fn discovery(&self) -> Discovery {
    self.inner.discovery
  }

  /// Whether both handles refer to the same container.
  pub fn ptr_eq(&self, other: &Container) -> bool {
    Rc::ptr_eq(&self.inner, &other.inner)
  }

  // --- Catalog ---

  pub fn register(&self, descriptor: TypeDescriptor) {
    self.inner.catalog.borrow_mut().register(descriptor);
  }

  pub fn register_lazy(&self, descriptor: TypeDescriptor) {
    self.inner.catalog.borrow_mut().register_lazy(descriptor);
  }

  // --- PRIVATE HELPERS ---

  fn bind_internal(&self, id: &str, implementation: &str, extra_arguments: Option<ExtraArguments>) {
    tracing::debug!(id, implementation, "binding");
    let binding = match extra_arguments {
      Some(args) => Binding::with_arguments(implementation, args),
      None => Binding::new(implementation),
    };
    self.inner.bindings.borrow_mut().insert(id, Rc::new(binding));
  }

  fn lookup(&self, id: &str) -> Option<Rc<Binding>> {
    self.inner.bindings.borrow().get(id).cloned()
  }

  // --- Binding ---

  /// Points `id` at `implementation`, replacing any previous binding (and its
  /// cached instance). Nothing is validated until `id` is resolved.
  pub fn bind(&self, id: &str, implementation: &str) {
    self.bind_internal(id, implementation, None);
  }

  /// Like [`Container::bind`], constructing `implementation` with the given
  /// named overrides.
  pub fn bind_with_arguments(&self, id: &str, implementation: &str, extra_arguments: ExtraArguments) {
    self.bind_internal(id, implementation, Some(extra_arguments));
  }

  /// Places an existing binding under `id`. Handing the same `Rc` to several
  /// identifiers makes them share one instance.
  pub fn insert_binding(&self, id: &str, binding: Rc<Binding>) {
    self.inner.bindings.borrow_mut().insert(id, binding);
  }

  /// Snapshot of the binding table, including the self-registration.
  pub fn bindings(&self) -> HashMap<String, Rc<Binding>> {
    self.inner.bindings.borrow().snapshot()
  }

  // --- Resolution ---

  /// Whether `id` is bound. Never instantiates anything.
  pub fn has(&self, id: &str) -> bool {
    self.inner.bindings.borrow().contains(id)
  }

  /// Resolves the shared instance for `id`.
  ///
  /// Unbound identifiers are constructed as concrete types and cached under a
  /// new binding. Bound identifiers follow their alias chain; the instance
  /// found or built at its end is stored into every binding on the way.
  pub fn get(&self, id: &str) -> Result<Instance> {
    let Some(binding) = self.lookup(id) else {
      let _guard = ResolutionGuard::enter(&self.inner.resolving, id)?;
      tracing::debug!(id, "no binding, instantiating directly");
      let instance = self.create(id, None)?;
      self.insert_binding(id, Rc::new(Binding::with_instance(id, Rc::clone(&instance))));
      return Ok(instance);
    };

    if let Some(instance) = binding.instance() {
      return Ok(instance);
    }

    let _guard = ResolutionGuard::enter(&self.inner.resolving, id)?;
    let inner_binding = self.inner.bindings.borrow().first_binding_with_instance(&binding);
    let instance = match inner_binding.instance() {
      Some(instance) => instance,
      None => {
        tracing::debug!(id, implementation = inner_binding.implementation(), "resolving binding");
        self.create(inner_binding.implementation(), inner_binding.extra_arguments())?
      }
    };
    self.inner.bindings.borrow().share_instance(&binding, &instance);
    Ok(instance)
  }

  /// [`Container::get`] followed by a downcast to `T`.
  pub fn get_as<T: Any>(&self, id: &str) -> Result<Rc<T>> {
    self.get(id)?.downcast::<T>().map_err(|_| Error::TypeMismatch {
      id: id.to_owned(),
      expected: type_name::<T>(),
    })
  }

  /// Builds a fresh instance of `implementation`, bypassing the binding table.
  /// The result is not cached. Any failure is wrapped with the implementation name.
  pub fn create(&self, implementation: &str, extra_arguments: Option<&ExtraArguments>) -> Result<Instance> {
    tracing::debug!(implementation, "creating instance");
    self
      .instantiate(implementation, extra_arguments)
      .map_err(|e| Error::wrap(implementation, e))
  }

  /// [`Container::create`] followed by a downcast to `T`.
  pub fn create_as<T: Any>(
    &self,
    implementation: &str,
    extra_arguments: Option<&ExtraArguments>,
  ) -> Result<Rc<T>> {
    self
      .create(implementation, extra_arguments)?
      .downcast::<T>()
      .map_err(|_| Error::TypeMismatch {
        id: implementation.to_owned(),
        expected: type_name::<T>(),
      })
  }
}

impl Resolver for Container {
  fn get(&self, id: &str) -> Result<Instance> {
    Container::get(self, id)
  }

  fn has(&self, id: &str) -> bool {
    Container::has(self, id)
  }

  fn create(&self, implementation: &str, extra_arguments: Option<&ExtraArguments>) -> Result<Instance> {
    Container::create(self, implementation, extra_arguments)
  }

  fn bind(&self, id: &str, implementation: &str, extra_arguments: Option<ExtraArguments>) {
    self.bind_internal(id, implementation, extra_arguments);
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("bindings", &self.inner.bindings.borrow().len())
      .field("catalog", &*self.inner.catalog.borrow())
      .field("discovery", &self.inner.discovery)
      .finish()
  }
}

// --- Builder ---

/// Assembles a [`Container`] from a catalog, seed bindings and a discovery strategy.
#[derive(Default)]
pub struct ContainerBuilder {
  catalog: Catalog,
  bindings: Vec<(String, Rc<Binding>)>,
  discovery: Discovery,
}

impl ContainerBuilder {
  pub fn catalog(mut self, catalog: Catalog) -> Self {
    self.catalog = catalog;
    self
  }

  pub fn discovery(mut self, discovery: Discovery) -> Self {
    self.discovery = discovery;
    self
  }

  /// Shorthand for `discovery(Discovery::NameSimilarity)`.
  pub fn failsafe(self) -> Self {
    self.discovery(Discovery::NameSimilarity)
  }

  /// Seeds `id` with `binding`. The same `Rc` may be seeded under several identifiers.
  pub fn binding(mut self, id: impl Into<String>, binding: Rc<Binding>) -> Self {
    self.bindings.push((id.into(), binding));
    self
  }

  pub fn bindings<I, S>(mut self, bindings: I) -> Self
  where
    I: IntoIterator<Item = (S, Rc<Binding>)>,
    S: Into<String>,
  {
    self
      .bindings
      .extend(bindings.into_iter().map(|(id, binding)| (id.into(), binding)));
    self
  }

  pub fn bind(self, id: impl Into<String>, implementation: impl Into<String>) -> Self {
    self.binding(id, Rc::new(Binding::new(implementation)))
  }

  pub fn bind_with_arguments(
    self,
    id: impl Into<String>,
    implementation: impl Into<String>,
    extra_arguments: ExtraArguments,
  ) -> Self {
    self.binding(id, Rc::new(Binding::with_arguments(implementation, extra_arguments)))
  }

  /// Applies a loaded configuration: its bindings, and its discovery strategy
  /// when the configuration names one.
  pub fn config(mut self, config: ContainerConfig) -> Self {
    if let Some(discovery) = config.discovery {
      self.discovery = discovery;
    }
    for (id, binding) in config.into_bindings() {
      self = self.binding(id, Rc::new(binding));
    }
    self
  }

  pub fn build(self) -> Container {
    let ContainerBuilder {
      catalog,
      bindings,
      discovery,
    } = self;

    let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
      let mut table = BindingTable::default();
      for (id, binding) in bindings {
        table.insert(id, binding);
      }
      // Self-registration goes in last so seeds cannot shadow it.
      let handle: Instance = Rc::new(ContainerHandle {
        inner: weak.clone(),
      });
      let own = Rc::new(Binding::with_instance(CONTAINER_ID, handle));
      table.insert(CONTAINER_ID, Rc::clone(&own));
      table.insert(RESOLVER_ID, own);

      Inner {
        bindings: RefCell::new(table),
        catalog: RefCell::new(catalog),
        discovery,
        resolving: RefCell::new(HashSet::new()),
      }
    });

    Container { inner }
  }
}
