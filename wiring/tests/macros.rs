use fibre_wiring::{args, assemble, impl_param, resolve, Arg, Config, Container, Param, TypeRegistry, Value};
use std::sync::Arc;

// --- Macro Fixtures ---

#[derive(Debug, Clone, PartialEq)]
struct Settings {
  retries: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Limits {
  max: usize,
}

impl_param!(Settings);
impl_param!(default: Limits);

assemble! {
  /// A struct declared through the macro keeps its attributes.
  #[derive(Debug)]
  pub struct Client {
    pub name: String,
    pub settings: Option<Settings>,
    pub limits: Limits,
  }
}

fn new_retries(settings: Settings) -> u8 {
  settings.retries
}

// --- Macro Tests ---

#[test]
fn test_args_macro_builds_text_and_literals() {
  let args = args!["@logger", "%level%", 3_u8, true];
  assert_eq!(args.len(), 4);
  assert_eq!(args[0].as_text(), Some("@logger"));
  assert!(args[1].is_placeholder());
  assert!(matches!(args[2], Arg::Literal(ref value) if value.is::<u8>()));
  assert!(matches!(args[3], Arg::Literal(ref value) if value.is::<bool>()));
  assert!(args![].is_empty());
}

#[test]
fn test_impl_param_accepts_instances() {
  let value = Value::new(Settings { retries: 2 });
  assert_eq!(Settings::from_value(&value), Some(Settings { retries: 2 }));
  assert_eq!(Settings::zero(), None);
  assert_eq!(Limits::zero(), Some(Limits::default()));
}

#[test]
fn test_impl_param_types_can_be_injected() {
  let mut registry = TypeRegistry::new();
  registry.inject_instance("settings", Settings { retries: 5 });
  registry.register_type("retries", new_retries, args!["@settings"]);
  let container = Container::new(registry, Config::new());

  assert_eq!(resolve!(container, u8, "retries"), 5);
}

#[test]
fn test_assemble_struct_with_optional_and_default_fields() {
  let mut registry = TypeRegistry::new();
  registry.inject_instance("settings", Settings { retries: 1 });
  registry.register_type("full", Client::default(), args!["full", "@settings", "@limits"]);
  registry.register_type("sparse", Client::default(), args!["sparse", "@?settings_missing", "@?limits"]);
  registry.inject_instance("limits", Limits { max: 10 });
  let container = Container::new(registry, Config::new());

  let full = resolve!(container, Arc<Client>, "full");
  assert_eq!(full.name, "full");
  assert_eq!(full.settings, Some(Settings { retries: 1 }));
  assert_eq!(full.limits, Limits { max: 10 });

  let sparse = resolve!(container, Arc<Client>, "sparse");
  assert_eq!(sparse.settings, None);
  assert_eq!(sparse.limits, Limits { max: 10 });
}

#[test]
fn test_resolve_untyped_form() {
  let mut registry = TypeRegistry::new();
  registry.inject_instance("answer", 42_i64);
  let container = Container::new(registry, Config::new());

  let value = resolve!(container, "answer");
  assert_eq!(value.downcast_ref::<i64>(), Some(&42));
}

#[test]
#[should_panic(expected = "Failed to resolve required type \"missing\"")]
fn test_resolve_panics_for_missing_type() {
  let container = Container::default();
  let _ = resolve!(container, Arc<String>, "missing");
}

#[test]
#[should_panic(expected = "Failed to resolve required type \"answer\" as")]
fn test_resolve_panics_for_wrong_type() {
  let mut registry = TypeRegistry::new();
  registry.inject_instance("answer", 42_i64);
  let container = Container::new(registry, Config::new());
  let _ = resolve!(container, String, "answer");
}
