//! Autowiring: building an instance from a descriptor and resolving every
//! constructor parameter.

use crate::catalog::{Arguments, Parameter, TypeDescriptor};
use crate::container::Container;
use crate::discovery::{self, Discovery};
use crate::error::{Error, Result};
use crate::value::{ExtraArguments, Instance, Value};
use std::rc::Rc;

impl Container {
  pub(crate) fn instantiate(
    &self,
    implementation: &str,
    extra_arguments: Option<&ExtraArguments>,
  ) -> Result<Instance> {
    let descriptor = self.concrete_descriptor(implementation)?;
    if !descriptor.is_instantiable() {
      return Err(Error::NotInstantiable(descriptor.name().to_owned()));
    }

    let mut arguments = Arguments::with_capacity(descriptor.parameters().len());
    for parameter in descriptor.parameters() {
      let value = self.resolve_parameter(parameter, extra_arguments)?;
      arguments.push(parameter.name(), value);
    }

    tracing::trace!(
      implementation = descriptor.name(),
      arguments = arguments.len(),
      "invoking constructor"
    );
    descriptor.construct(&arguments)
  }

  /// The descriptor to construct for `implementation`: itself when concrete,
  /// otherwise whatever discovery comes up with.
  fn concrete_descriptor(&self, implementation: &str) -> Result<Rc<TypeDescriptor>> {
    let mut catalog = self.inner.catalog.borrow_mut();
    let descriptor = catalog
      .load(implementation)
      .ok_or_else(|| Error::UnknownType(implementation.to_owned()))?;
    if !descriptor.is_abstract() {
      return Ok(descriptor);
    }
    match self.inner.discovery {
      Discovery::Disabled => Err(Error::BindingNotFound(implementation.to_owned())),
      Discovery::NameSimilarity => discovery::discover(&mut catalog, &descriptor)
        .ok_or_else(|| Error::BindingNotFound(implementation.to_owned())),
    }
  }

  /// Override, then binding by declared type, then default, then null.
  fn resolve_parameter(
    &self,
    parameter: &Parameter,
    extra_arguments: Option<&ExtraArguments>,
  ) -> Result<Value> {
    let name = parameter.name();

    if let Some(argument) = extra_arguments.and_then(|args| args.get(name)) {
      if parameter.class().is_some() {
        if let Some(id) = argument.as_str().filter(|id| self.has(id)) {
          tracing::trace!(parameter = name, id, "override refers to a binding");
          return self.get(id).map(Value::Instance);
        }
      }
      tracing::trace!(parameter = name, "using override");
      return Ok(argument.clone());
    }

    let mut deferred = None;
    if let Some(class) = parameter.class() {
      match self.get(class) {
        Ok(instance) => return Ok(Value::Instance(instance)),
        Err(e) => {
          tracing::debug!(parameter = name, class, error = %e, "typed resolution failed, trying fallbacks");
          deferred = Some(Box::new(e));
        }
      }
    }

    if let Some(default) = parameter.default_value() {
      tracing::trace!(parameter = name, "using default");
      return Ok(default.clone());
    }

    if parameter.is_nullable() {
      tracing::trace!(parameter = name, "using null");
      return Ok(Value::Null);
    }

    Err(Error::ParameterResolution {
      parameter: name.to_owned(),
      source: deferred,
    })
  }
}
