use fibre_autowire::{resolve, Catalog, Container, ErrorKind, TypeDescriptor};
use std::panic;

struct UnregisteredService;

fn main() {
  let container = Container::new(Catalog::new().with(TypeDescriptor::abstraction("Storage")));

  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a service that was never registered...");

  let result = panic::catch_unwind(|| {
    let container = Container::default();
    // This line will panic!
    let _service = resolve!(container, UnregisteredService);
  });

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible `get()` method ---
  println!("\nNow, attempting to resolve an abstraction nobody implements...");

  match container.get("Storage") {
    Ok(_) => panic!("Should not have found an implementation!"),
    Err(e) => {
      println!("Correctly received an error: {}", e);
      assert_eq!(e.kind(), ErrorKind::BindingNotFound);
    }
  }

  // A failed resolution leaves nothing behind.
  assert!(!container.has("Storage"));
}
