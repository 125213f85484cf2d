//! # Fibre Autowire
//!
//! A string-keyed, autowiring dependency-injection container for Rust.
//!
//! Ask the container for an identifier and it hands back a shared instance,
//! building it on first use. Constructor parameters are resolved from the
//! binding's explicit overrides, from other bindings by declared type, from
//! declared defaults, or as null, in that order.
//!
//! ## Core Concepts
//!
//! - **Catalog**: explicit [`TypeDescriptor`]s describing what can be built,
//!   standing in for runtime reflection.
//! - **Binding**: maps an identifier to another identifier (an alias) or to a
//!   concrete type, optionally with named argument overrides.
//! - **Sharing**: every identifier whose alias chain converges on the same
//!   binding, with the same overrides, gets the identical instance.
//! - **Discovery**: opt-in. A failsafe container picks a concrete subtype for
//!   an unbound abstraction by name similarity.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_autowire::{arguments, Catalog, Container, Parameter, TypeDescriptor};
//!
//! trait Greeter {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!   message: String,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     self.message.clone()
//!   }
//! }
//!
//! let catalog = Catalog::new()
//!   .with(TypeDescriptor::abstraction("Greeter"))
//!   .with(
//!     TypeDescriptor::concrete("EnglishGreeter", |args| {
//!       Ok(EnglishGreeter { message: args.string("message")? })
//!     })
//!     .implements("Greeter")
//!     .param(Parameter::new("message").with_default("Hello!")),
//!   );
//!
//! let container = Container::new(catalog);
//! container.bind("Greeter", "EnglishGreeter");
//! container.bind_with_arguments(
//!   "formal_greeter",
//!   "EnglishGreeter",
//!   arguments! { "message" => "Good day." },
//! );
//!
//! let greeter = container.get_as::<EnglishGreeter>("Greeter").unwrap();
//! assert_eq!(greeter.greet(), "Hello!");
//!
//! let formal = container.get_as::<EnglishGreeter>("formal_greeter").unwrap();
//! assert_eq!(formal.greet(), "Good day.");
//! ```

mod binding;
mod catalog;
mod config;
mod container;
mod core;
mod discovery;
mod error;
mod macros;
mod resolver;
mod value;

pub use binding::Binding;
pub use catalog::{Arguments, Catalog, Parameter, TypeDescriptor};
pub use config::{BindingConfig, ContainerConfig, ScalarConfig};
pub use container::{Container, ContainerBuilder, ContainerHandle, Resolver, CONTAINER_ID, RESOLVER_ID};
pub use discovery::{short_name, similar_text, Discovery};
pub use error::{Error, ErrorKind, Result};
pub use value::{ExtraArguments, Instance, Value};
