//! The exported methods of registered instance types.
//!
//! Proxy and function-reference factories select a method by name on the
//! runtime type of an instance. Methods are registered explicitly with
//! `TypeRegistry::register_method` and looked up by `(TypeId, name)`.

use crate::callable::{is_exported, IntoMethod, Method};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MethodTable {
  methods: HashMap<(TypeId, String), Method>,
}

impl MethodTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `method` as `name` on `Recv`. Registering a name twice replaces
  /// the earlier method.
  pub fn register<Recv, Args, F>(&mut self, name: &str, method: F)
  where
    Recv: Send + Sync + 'static,
    F: IntoMethod<Recv, Args>,
  {
    let method = method.into_method(name);
    self
      .methods
      .insert((TypeId::of::<Arc<Recv>>(), name.to_string()), method.clone());
    self.methods.insert((TypeId::of::<Recv>(), name.to_string()), method);
  }

  /// Finds the exported method `name` on the instance type `receiver`.
  /// Unexported names are never found, even if registered.
  pub fn find(&self, receiver: TypeId, name: &str) -> Option<&Method> {
    if !is_exported(name) {
      return None;
    }
    self.methods.get(&(receiver, name.to_string()))
  }

  pub fn names_of(&self, receiver: TypeId) -> Vec<&str> {
    let mut names: Vec<&str> = self
      .methods
      .keys()
      .filter(|(type_id, _)| *type_id == receiver)
      .map(|(_, name)| name.as_str())
      .collect();
    names.sort_unstable();
    names
  }

  pub fn len(&self) -> usize {
    self.methods.len() / 2
  }

  pub fn is_empty(&self) -> bool {
    self.methods.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::value::{Bound, Value};

  struct Counter {
    start: u32,
  }

  #[test]
  fn finds_registered_methods_by_runtime_type() {
    let mut table = MethodTable::new();
    table.register("Next", |counter: &Counter, step: u32| counter.start + step);
    table.register("_reset", |_counter: &Counter| 0_u32);

    let receiver = Value::new(Counter { start: 40 });
    let method = table.find(receiver.type_id(), "Next").unwrap();
    let result = method.invoke(&receiver, vec![Box::new(2_u32) as Bound]).unwrap();
    assert_eq!(result.downcast_ref::<u32>(), Some(&42));

    assert!(table.find(receiver.type_id(), "_reset").is_none());
    assert!(table.find(TypeId::of::<String>(), "Next").is_none());
    assert_eq!(table.names_of(TypeId::of::<Counter>()), vec!["Next", "_reset"]);
  }

  #[test]
  fn bound_methods_are_callable() {
    let mut table = MethodTable::new();
    table.register("Add", |counter: &Counter, step: u32| counter.start + step);

    let receiver = Value::new(Counter { start: 1 });
    let method = table.find(receiver.type_id(), "Add").unwrap();
    let bound = method.bind(&receiver).unwrap();
    let add = bound.shared::<dyn Fn(u32) -> u32 + Send + Sync>().unwrap();
    assert_eq!(add(2), 3);
  }
}
