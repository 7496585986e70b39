use fibre_wiring::{args, Config, Container, Error, Factory, TypeRegistry, Value};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Test Fixtures ---

#[derive(Debug)]
struct Logger {
  name: String,
}

fn new_logger(name: String) -> Logger {
  Logger { name }
}

struct Mailer {
  logger: Arc<Logger>,
  sender: String,
}

fn new_mailer(logger: Arc<Logger>, sender: String) -> Mailer {
  Mailer { logger, sender }
}

fn container_with(registry: TypeRegistry) -> Container {
  Container::new(registry, Config::new())
}

// --- Basic Tests ---

#[test]
fn test_get_builds_registered_type() {
  // Arrange
  let mut registry = TypeRegistry::new();
  registry.register_type("logger", new_logger, args!["main"]);
  let container = container_with(registry);

  // Act
  let logger = container.get("logger").unwrap();

  // Assert
  assert_eq!(logger.downcast_ref::<Logger>().unwrap().name, "main");
}

#[test]
fn test_singleton_returns_same_instance() {
  let mut registry = TypeRegistry::new();
  registry.register_type("logger", new_logger, args!["main"]);
  let container = container_with(registry);

  let first = container.get("logger").unwrap();
  let second = container.get("logger").unwrap();
  assert!(first.ptr_eq(&second));

  let shared_first = container.get_as::<Arc<Logger>>("logger").unwrap();
  let shared_second = container.get_as::<Arc<Logger>>("logger").unwrap();
  assert!(Arc::ptr_eq(&shared_first, &shared_second));
}

#[test]
fn test_factory_runs_once() {
  static CALLS: AtomicUsize = AtomicUsize::new(0);
  fn counted() -> u64 {
    CALLS.fetch_add(1, Ordering::SeqCst) as u64
  }

  let mut registry = TypeRegistry::new();
  registry.register_type("counted", counted, args![]);
  let container = container_with(registry);

  for _ in 0..5 {
    container.get("counted").unwrap();
  }
  assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_references_share_instances() {
  let mut registry = TypeRegistry::new();
  registry.register_type("logger", new_logger, args!["main"]);
  registry.register_type("mailer", new_mailer, args!["@logger", "noreply@example.com"]);
  let container = container_with(registry);

  let mailer = container.get_as::<Arc<Mailer>>("mailer").unwrap();
  let logger = container.get_as::<Arc<Logger>>("logger").unwrap();

  assert!(Arc::ptr_eq(&mailer.logger, &logger));
  assert_eq!(mailer.sender, "noreply@example.com");
}

#[test]
fn test_unknown_type_fails() {
  let container = Container::default();
  let error = container.get("missing").unwrap_err();
  assert!(matches!(error, Error::UnknownTypeReference { ref id } if id == "missing"));
  assert_eq!(error.to_string(), "the referenced type \"@missing\" has not been defined");
}

#[test]
#[should_panic(expected = "has not been defined")]
fn test_must_get_panics_for_unknown_type() {
  Container::default().must_get("missing");
}

#[test]
fn test_injected_instance_is_returned_as_is() {
  let mut registry = TypeRegistry::new();
  let logger = Arc::new(Logger {
    name: "injected".to_string(),
  });
  registry.inject_instance("logger", Arc::clone(&logger));
  let container = container_with(registry);

  let resolved = container.get_as::<Arc<Logger>>("logger").unwrap();
  assert!(Arc::ptr_eq(&resolved, &logger));
}

#[test]
fn test_instance_factory_without_value_is_invalid() {
  let factory = fibre_wiring::InstanceFactory::from_value(None);
  assert!(!factory.is_valid());

  let mut registry = TypeRegistry::new();
  registry.register("nothing", factory);
  registry.register("something", fibre_wiring::InstanceFactory::from_value(Some(Value::new(7_u8))));
  let container = container_with(registry);

  let error = container.get("nothing").unwrap_err();
  assert!(matches!(error.root_cause(), Error::InvalidFactory { .. }));
  assert_eq!(container.must_get_as::<u8>("something"), 7);
}

#[test]
fn test_get_as_rejects_wrong_type() {
  let mut registry = TypeRegistry::new();
  registry.inject_instance("number", 5_u32);
  let container = container_with(registry);

  assert_eq!(container.get_as::<u64>("number").unwrap(), 5);
  let error = container.get_as::<String>("number").unwrap_err();
  assert!(matches!(error, Error::TypeMismatch { .. }));
}

#[test]
fn test_invalid_factory_fails_on_every_get() {
  let mut registry = TypeRegistry::new();
  registry.register("broken", Factory::function(new_logger, args![]));
  let container = container_with(registry);

  for _ in 0..2 {
    let error = container.get("broken").unwrap_err();
    assert!(matches!(error, Error::Generation { ref id, .. } if id == "broken"));
    assert!(matches!(error.root_cause(), Error::InvalidFactory { .. }));
  }
  assert!(container.cached_type_ids().is_empty());
}

#[test]
fn test_cache_introspection() {
  let mut registry = TypeRegistry::new();
  registry.register_type("logger", new_logger, args!["main"]);
  registry.register_type("mailer", new_mailer, args!["@logger", "a@b.c"]);
  registry.inject_instance("unused", 1_i32);
  let container = container_with(registry);

  container.get("mailer").unwrap();

  assert_eq!(container.cached_type_ids(), vec!["logger", "mailer"]);
  let cached = container.collect_cached_instances();
  assert_eq!(cached.len(), 2);
  assert!(cached["logger"].is::<Logger>());
  assert_eq!(container.instances().count(), 2);
}

#[test]
fn test_get_while_iterating_instances() {
  let mut registry = TypeRegistry::new();
  for index in 0..200 {
    registry.register_type(&format!("logger{}", index), new_logger, args!["main"]);
  }
  let container = container_with(registry);
  container.get("logger0").unwrap();

  let mut seen = 0;
  for (id, _) in container.instances() {
    assert_eq!(id, "logger0");
    seen += 1;
    for index in 1..200 {
      container.get(&format!("logger{}", index)).unwrap();
    }
  }

  assert_eq!(seen, 1);
  assert_eq!(container.instances().count(), 200);
}

#[test]
fn test_get_multiple_skips_failures() {
  let mut registry = TypeRegistry::new();
  registry.register_type("logger", new_logger, args!["main"]);
  registry.register_type("mailer", new_mailer, args!["@missing", "a@b.c"]);
  let container = container_with(registry);

  let found = container.get_multiple(["logger", "mailer", "unknown"]);
  assert_eq!(found.len(), 1);
  assert!(found.contains_key("logger"));
}

#[test]
fn test_get_all_instances() {
  let mut registry = TypeRegistry::new();
  registry.register_type("logger", new_logger, args!["main"]);
  registry.inject_instance("answer", 42_u64);
  let container = container_with(registry);

  let all = container.get_all_instances().unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all["answer"].downcast_ref::<u64>(), Some(&42));
}

#[test]
fn test_warmup_builds_everything() {
  let mut registry = TypeRegistry::new();
  registry.register_type("logger", new_logger, args!["main"]);
  registry.register_type("mailer", new_mailer, args!["@logger", "a@b.c"]);
  let container = container_with(registry);

  container.warmup_cache().unwrap();
  assert_eq!(container.cached_type_ids(), vec!["logger", "mailer"]);
}

#[test]
fn test_warmup_stops_at_first_failure() {
  let mut registry = TypeRegistry::new();
  registry.register_type("a_logger", new_logger, args!["main"]);
  registry.register_type("b_mailer", new_mailer, args!["@missing", "a@b.c"]);
  registry.register_type("c_logger", new_logger, args!["other"]);
  let container = container_with(registry);

  let error = container.warmup_cache().unwrap_err();
  assert!(matches!(error, Error::Warmup { ref id, .. } if id == "b_mailer"));
  assert!(matches!(error.root_cause(), Error::UnknownTypeReference { ref id } if id == "missing"));
  assert_eq!(container.cached_type_ids(), vec!["a_logger"]);
}

#[test]
fn test_registrations_after_get_do_not_replace_cached_instances() {
  let mut container = Container::default();
  container.registry_mut().register_type("logger", new_logger, args!["first"]);
  let first = container.get("logger").unwrap();

  container.registry_mut().register_type("logger", new_logger, args!["second"]);
  let again = container.get("logger").unwrap();

  assert!(first.ptr_eq(&again));
  assert_eq!(again.downcast_ref::<Logger>().unwrap().name, "first");
}

#[test]
fn test_instances_are_dropped_with_the_container() {
  static DROPS: AtomicUsize = AtomicUsize::new(0);

  struct Tracked;
  impl Drop for Tracked {
    fn drop(&mut self) {
      DROPS.fetch_add(1, Ordering::SeqCst);
    }
  }

  fn new_tracked() -> Tracked {
    Tracked
  }

  {
    let mut registry = TypeRegistry::new();
    registry.register_type("tracked", new_tracked, args![]);
    let container = container_with(registry);
    container.get("tracked").unwrap();
    assert_eq!(DROPS.load(Ordering::SeqCst), 0);
  }
  assert_eq!(DROPS.load(Ordering::SeqCst), 1);
}
