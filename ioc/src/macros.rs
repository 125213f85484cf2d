//! Public macros for ergonomic resolution and override maps.

/// Resolves a typed instance from a container, panicking on failure.
///
/// Without an identifier, the type's own `type_name` is used, which matches
/// descriptors registered through `TypeDescriptor::of`.
///
/// # Panics
///
/// Panics if the identifier cannot be resolved or resolves to another type.
/// For a non-panicking version, use `Container::get_as` directly.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{resolve, Catalog, Container, TypeDescriptor};
///
/// struct Greeting(String);
///
/// let container = Container::new(
///   Catalog::new().with(TypeDescriptor::of(|_| Ok(Greeting("hello".to_string())))),
/// );
///
/// let greeting = resolve!(container, Greeting);
/// assert_eq!(greeting.0, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  // Arm for resolving by type name: resolve!(container, MyService)
  ($container:expr, $type:ty) => {
    $crate::resolve!($container, $type, ::std::any::type_name::<$type>())
  };

  // Arm for resolving a named binding: resolve!(container, MyService, "name")
  ($container:expr, $type:ty, $id:expr) => {{
    let id: &str = $id;
    $container.get_as::<$type>(id).unwrap_or_else(|e| {
      panic!(
        "Failed to resolve required service '{}' as {}: {}",
        id,
        ::std::any::type_name::<$type>(),
        e
      )
    })
  }};
}

/// Builds an `ExtraArguments` map from `name => value` pairs.
///
/// ```
/// use fibre_autowire::{arguments, Value};
///
/// let args = arguments! { "dsn" => "postgres://localhost", "pool" => 4 };
/// assert_eq!(args["pool"], Value::Int(4));
/// ```
#[macro_export]
macro_rules! arguments {
  () => {
    $crate::ExtraArguments::new()
  };
  ($($name:expr => $value:expr),+ $(,)?) => {{
    let mut args = $crate::ExtraArguments::new();
    $(
      args.insert(::std::string::String::from($name), $crate::Value::from($value));
    )+
    args
  }};
}
