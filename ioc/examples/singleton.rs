use fibre_autowire::{Catalog, Container, TypeDescriptor};
use std::cell::Cell;
use std::rc::Rc;

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

fn main() {
  // A counter shared with the constructor to generate unique IDs.
  let next_id = Rc::new(Cell::new(0));
  let counter = Rc::clone(&next_id);

  let catalog = Catalog::new()
    .with(TypeDescriptor::abstraction("Tracker"))
    .with(
      TypeDescriptor::concrete("RequestTracker", move |_| {
        println!("Creating RequestTracker...");
        let id = counter.get();
        counter.set(id + 1);
        Ok(RequestTracker { id })
      })
      .implements("Tracker"),
    );

  let container = Container::new(catalog);

  // --- Aliases ---
  // "tracker" -> "Tracker" -> "RequestTracker": one chain, one instance.
  // Binding the concrete type to itself puts it on the chain too.
  container.bind("tracker", "Tracker");
  container.bind("Tracker", "RequestTracker");
  container.bind("RequestTracker", "RequestTracker");

  println!("--- Resolving through aliases ---");
  let s1 = container.get_as::<RequestTracker>("tracker").unwrap();
  let s2 = container.get_as::<RequestTracker>("Tracker").unwrap();
  let s3 = container.get_as::<RequestTracker>("RequestTracker").unwrap();
  println!("IDs: {}, {}, {}", s1.id, s2.id, s3.id);
  assert!(Rc::ptr_eq(&s1, &s2), "Aliases should share the instance");
  assert!(Rc::ptr_eq(&s2, &s3), "Aliases should share the instance");
  println!("All aliases returned the same pointer, as expected.\n");

  // --- Fresh instances ---
  // `create` always builds a new one and never caches it.
  println!("--- Creating directly ---");
  let t1 = container.create_as::<RequestTracker>("RequestTracker", None).unwrap();
  let t2 = container.create_as::<RequestTracker>("RequestTracker", None).unwrap();
  println!("Created IDs: {}, {}", t1.id, t2.id);
  assert_eq!(t1.id, 1);
  assert_eq!(t2.id, 2);
  assert!(!Rc::ptr_eq(&t1, &t2), "Created instances should be different");
  assert_eq!(next_id.get(), 3);
  println!("Created instances are different pointers, as expected.");
}
