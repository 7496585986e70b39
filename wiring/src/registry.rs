//! The `TypeRegistry`: type ids bound to factory descriptors.

use crate::argument::Arg;
use crate::callable::IntoMethod;
use crate::cast::Casts;
use crate::factory::{Factory, IntoFactory};
use crate::methods::MethodTable;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{trace, warn};

/// Maps type ids to factories, together with the method and cast tables that
/// proxies, function references and trait-object parameters rely on.
///
/// Registering an id twice replaces the earlier factory. The registry is
/// unordered.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
  factories: HashMap<String, Factory>,
  methods: MethodTable,
  casts: Casts,
}

impl TypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, id: &str, factory: impl Into<Factory>) {
    let factory = factory.into();
    match factory.invalid_reason() {
      Some(reason) => warn!(type_id = id, reason, "registered an invalid factory"),
      None => trace!(type_id = id, kind = factory.kind(), "registered type"),
    }
    self.factories.insert(id.to_string(), factory);
  }

  /// Registers a constructor function or an `Assemble` struct prototype,
  /// inferring the factory kind from the shape.
  ///
  /// ```ignore
  /// registry.register_type("logger", new_logger, args!["%log.level%"]);
  /// registry.register_type("server", Server::default(), args!["@logger"]);
  /// ```
  pub fn register_type<M>(&mut self, id: &str, shape: impl IntoFactory<M>, args: Vec<Arg>) {
    self.register(id, shape.into_factory(args));
  }

  /// Registers every `(id, factory)` pair. Later pairs win on duplicate ids.
  pub fn register_all<I, S>(&mut self, factories: I)
  where
    I: IntoIterator<Item = (S, Factory)>,
    S: AsRef<str>,
  {
    for (id, factory) in factories {
      self.register(id.as_ref(), factory);
    }
  }

  /// Registers a pre-built instance.
  pub fn inject_instance<T: Send + Sync + 'static>(&mut self, id: &str, instance: T) {
    self.register(id, Factory::instance(instance));
  }

  /// Exposes `method` as the exported method `name` of `Recv` instances, for
  /// `@id::name` references and proxy factories.
  pub fn register_method<Recv, Args, F>(&mut self, name: &str, method: F)
  where
    Recv: Send + Sync + 'static,
    F: IntoMethod<Recv, Args>,
  {
    trace!(method = name, receiver = std::any::type_name::<Recv>(), "registered method");
    self.methods.register(name, method);
  }

  /// Makes `T` instances assignable to `Arc<U>` parameters.
  pub fn register_cast<T, U>(&mut self, cast: fn(Arc<T>) -> Arc<U>)
  where
    T: Send + Sync + 'static,
    U: ?Sized + Send + Sync + 'static,
  {
    self.casts.register(cast);
  }

  pub fn get(&self, id: &str) -> Option<&Factory> {
    self.factories.get(id)
  }

  pub fn contains(&self, id: &str) -> bool {
    self.factories.contains_key(id)
  }

  pub fn len(&self) -> usize {
    self.factories.len()
  }

  pub fn is_empty(&self) -> bool {
    self.factories.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Factory)> {
    self.factories.iter().map(|(id, factory)| (id.as_str(), factory))
  }

  pub fn type_ids(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }

  pub fn factories(&self) -> impl Iterator<Item = &Factory> {
    self.factories.values()
  }

  /// All registered ids, sorted.
  pub fn collect_type_ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self.factories.keys().cloned().collect();
    ids.sort_unstable();
    ids
  }

  /// Ids whose factory is statically known to produce a `T`.
  pub fn filter_by_type<T: 'static>(&self) -> impl Iterator<Item = &str> {
    let wanted = TypeId::of::<T>();
    self
      .iter()
      .filter(move |(_, factory)| factory.output_type() == Some(wanted))
      .map(|(id, _)| id)
  }

  pub fn methods(&self) -> &MethodTable {
    &self.methods
  }

  pub fn casts(&self) -> &Casts {
    &self.casts
  }
}

impl<S: AsRef<str>> Extend<(S, Factory)> for TypeRegistry {
  fn extend<I: IntoIterator<Item = (S, Factory)>>(&mut self, iter: I) {
    self.register_all(iter);
  }
}

impl<S: AsRef<str>> FromIterator<(S, Factory)> for TypeRegistry {
  fn from_iter<I: IntoIterator<Item = (S, Factory)>>(iter: I) -> Self {
    let mut registry = Self::new();
    registry.register_all(iter);
    registry
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::args;
  use pretty_assertions::assert_eq;

  fn new_name() -> String {
    "name".to_string()
  }

  fn new_length(name: String) -> usize {
    name.len()
  }

  #[test]
  fn last_registration_wins() {
    let mut registry = TypeRegistry::new();
    registry.register_type("a", new_name, args![]);
    registry.register_type("a", new_length, args!["@b"]);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("a").unwrap().arguments(), args!["@b"]);
  }

  #[test]
  fn bulk_registration_keeps_invalid_descriptors() {
    let registry: TypeRegistry = vec![
      ("ok", Factory::function(new_name, args![])),
      ("broken", Factory::function(new_length, args![])),
      ("value", Factory::instance(42_u32)),
    ]
    .into_iter()
    .collect();

    assert_eq!(registry.collect_type_ids(), vec!["broken", "ok", "value"]);
    assert!(registry.get("ok").unwrap().is_valid());
    assert!(!registry.get("broken").unwrap().is_valid());
    assert!(registry.get("broken").unwrap().invalid_reason().unwrap().contains("number of arguments"));
  }

  #[test]
  fn filters_by_output_type() {
    let mut registry = TypeRegistry::new();
    registry.register_type("name", new_name, args![]);
    registry.register_type("length", new_length, args!["@name"]);
    registry.inject_instance("other_name", "static".to_string());
    registry.register("proxy", Factory::proxy("name", "Len", args![]));

    let mut strings: Vec<&str> = registry.filter_by_type::<String>().collect();
    strings.sort_unstable();
    assert_eq!(strings, vec!["name", "other_name"]);
    assert_eq!(registry.filter_by_type::<usize>().collect::<Vec<_>>(), vec!["length"]);
  }
}
