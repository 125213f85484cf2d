mod common;

use common::{catalog, dsn_arguments, Database, Repository, Settings, UserService};
use fibre_autowire::{arguments, Binding, Container, Instance};
use std::rc::Rc;

fn assert_same(left: &Instance, right: &Instance) {
  assert!(Rc::ptr_eq(left, right), "expected the identical instance");
}

// --- Alias chains ---

#[test]
fn test_aliases_share_one_instance() {
  // Arrange
  let container = Container::new(catalog());
  container.bind("SettingsSource", "Settings");
  container.bind_with_arguments("Connection", "Database", dsn_arguments());
  container.bind("Store", "Repository");
  container.bind("Service", "UserService");
  container.bind_with_arguments("Database", "Database", dsn_arguments());

  // Act
  let service = container.get("UserService").unwrap();

  // Assert
  assert_same(&service, &container.get("Service").unwrap());
  assert_same(&container.get("Repository").unwrap(), &container.get("Store").unwrap());
  assert_same(&container.get("Database").unwrap(), &container.get("Connection").unwrap());
  assert_same(&container.get("Settings").unwrap(), &container.get("SettingsSource").unwrap());
  assert!(service.downcast_ref::<UserService>().is_some());
}

#[test]
fn test_long_alias_chain() {
  // Arrange
  let container = Container::new(catalog());
  container.bind_with_arguments("Database", "Database", dsn_arguments());
  container.bind("a", "b");
  container.bind("b", "c");
  container.bind("c", "d");
  container.bind("d", "e");
  container.bind("e", "Service");
  container.bind("Service", "UserService");
  let service = container.get("UserService").unwrap();

  // Act
  let through_chain = container.get("a").unwrap();

  // Assert
  assert_same(&service, &through_chain);
  for id in ["b", "c", "d", "e", "Service"] {
    assert_same(&service, &container.get(id).unwrap());
  }
}

#[test]
fn test_instance_is_written_along_the_whole_chain() {
  // Arrange
  let container = Container::new(catalog());
  container.bind("a", "b");
  container.bind("b", "Settings");
  container.bind("Settings", "Settings");

  // Act
  let settings = container.get("a").unwrap();

  // Assert
  let bindings = container.bindings();
  for id in ["a", "b", "Settings"] {
    assert_same(&settings, &bindings[id].instance().unwrap());
  }
}

#[test]
fn test_resolving_from_the_middle_of_a_chain() {
  // Arrange
  let container = Container::new(catalog());
  container.bind("SettingsSource", "Settings");
  container.bind("Settings", "Settings");
  let before = common::constructed();

  // Act
  let concrete = container.get("Settings").unwrap();
  let alias = container.get("SettingsSource").unwrap();

  // Assert
  assert_same(&concrete, &alias);
  assert_eq!(common::constructed() - before, 1);
}

#[test]
fn test_alias_to_bound_concrete_with_matching_overrides() {
  // Arrange
  let container = Container::new(catalog());
  container.bind_with_arguments("Iface", "Settings", arguments! { "env" => "X" });
  container.bind_with_arguments("Settings", "Settings", arguments! { "env" => "X" });

  // Act
  let via_iface = container.get("Iface").unwrap();
  let via_concrete = container.get("Settings").unwrap();

  // Assert
  assert_same(&via_iface, &via_concrete);
  assert_eq!(via_iface.downcast::<Settings>().unwrap().env, "X");
}

#[test]
fn test_diverging_overrides_stop_the_chain() {
  // Arrange
  let container = Container::new(catalog());
  container.bind("Iface", "Settings");
  container.bind_with_arguments("Settings", "Settings", arguments! { "env" => "X" });

  // Act
  let via_iface = container.get_as::<Settings>("Iface").unwrap();
  let via_concrete = container.get_as::<Settings>("Settings").unwrap();

  // Assert
  assert!(!Rc::ptr_eq(&via_iface, &via_concrete));
  assert_eq!(via_iface.env, "production");
  assert_eq!(via_concrete.env, "X");
}

#[test]
fn test_absent_and_empty_overrides_differ() {
  // Arrange
  let container = Container::new(catalog());
  container.bind("Iface", "Settings");
  container.bind_with_arguments("Settings", "Settings", arguments! {});

  // Act
  let via_iface = container.get("Iface").unwrap();
  let via_concrete = container.get("Settings").unwrap();

  // Assert
  assert!(!Rc::ptr_eq(&via_iface, &via_concrete));
}

#[test]
fn test_override_order_does_not_matter() {
  // Arrange
  let container = Container::new(catalog());
  container.bind_with_arguments(
    "Connection",
    "Database",
    arguments! { "dsn" => common::DSN, "settings" => "Settings" },
  );
  container.bind_with_arguments(
    "Database",
    "Database",
    arguments! { "settings" => "Settings", "dsn" => common::DSN },
  );
  container.bind("Settings", "Settings");

  // Act
  let connection = container.get("Connection").unwrap();

  // Assert
  assert_same(&connection, &container.get("Database").unwrap());
}

// --- Seeded bindings ---

#[test]
fn test_seeded_shared_bindings() {
  // Arrange
  let settings = Rc::new(Binding::new("Settings"));
  let database = Rc::new(Binding::with_arguments("Database", dsn_arguments()));
  let repository = Rc::new(Binding::new("Repository"));
  let service = Rc::new(Binding::new("UserService"));

  let container = Container::builder()
    .catalog(catalog())
    .binding("Settings", Rc::clone(&settings))
    .binding("SettingsSource", settings)
    .binding("Database", Rc::clone(&database))
    .binding("Connection", database)
    .binding("Repository", Rc::clone(&repository))
    .binding("Store", repository)
    .binding("UserService", Rc::clone(&service))
    .binding("Service", Rc::clone(&service))
    .bind("a", "b")
    .bind("b", "c")
    .bind("c", "d")
    .bind("d", "e")
    .binding("e", service)
    .build();

  // Act
  let user_service = container.get_as::<UserService>("UserService").unwrap();

  // Assert
  let as_service = container.get_as::<UserService>("Service").unwrap();
  assert!(Rc::ptr_eq(&user_service, &as_service));
  let through_chain = container.get_as::<UserService>("a").unwrap();
  assert!(Rc::ptr_eq(&user_service, &through_chain));

  let store = container.get_as::<Repository>("Store").unwrap();
  assert!(Rc::ptr_eq(&store, &user_service.repository));
  let connection = container.get_as::<Database>("Connection").unwrap();
  assert!(Rc::ptr_eq(&connection, &user_service.database));
  let source = container.get_as::<Settings>("SettingsSource").unwrap();
  assert!(Rc::ptr_eq(&source, &user_service.settings));
}

#[test]
fn test_seeded_binding_with_instance() {
  // Arrange
  let settings: Instance = Rc::new(Settings { env: "seeded".into() });
  let container = Container::builder()
    .catalog(catalog())
    .binding("Settings", Rc::new(Binding::with_instance("Settings", Rc::clone(&settings))))
    .build();
  let before = common::constructed();

  // Act
  let resolved = container.get("Settings").unwrap();

  // Assert
  assert_same(&settings, &resolved);
  assert_eq!(common::constructed(), before);
}

#[test]
fn test_insert_binding_shares_between_identifiers() {
  // Arrange
  let container = Container::new(catalog());
  let shared = Rc::new(Binding::new("Settings"));
  container.insert_binding("primary", Rc::clone(&shared));
  container.insert_binding("secondary", shared);

  // Act
  let primary = container.get("primary").unwrap();

  // Assert
  assert_same(&primary, &container.get("secondary").unwrap());
}

// --- Construction counts ---

#[test]
fn test_each_type_constructed_at_most_once() {
  // Arrange
  let container = Container::new(catalog());
  container.bind("Service", "UserService");
  container.bind("Store", "Repository");
  container.bind_with_arguments("Database", "Database", dsn_arguments());
  let before = common::constructed();

  // Act
  for _ in 0..3 {
    container.get("UserService").unwrap();
    container.get("Service").unwrap();
    container.get("Store").unwrap();
  }

  // Assert
  // Settings, Database, Repository and UserService.
  assert_eq!(common::constructed() - before, 4);
}

// --- Termination ---

#[test]
fn test_self_alias_terminates() {
  // Arrange
  let container = Container::new(catalog());
  container.bind("a", "a");

  // Act
  let result = container.get("a");

  // Assert
  assert!(result.is_err());
}

#[test]
fn test_alias_loop_terminates() {
  // Arrange
  common::init_tracing();
  let container = Container::new(catalog());
  container.bind("a", "b");
  container.bind("b", "a");

  // Act
  let result = container.get("a");

  // Assert
  assert!(result.is_err());
  assert!(!container.bindings()["a"].has_instance());
}
