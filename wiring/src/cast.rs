//! Registered conversions between instance types.
//!
//! Rust has no runtime interface satisfaction, so "is this instance usable as
//! an `Arc<dyn Logger>`?" has to be answered by an explicit table. A cast is a
//! plain function `fn(Arc<T>) -> Arc<U>`, which for trait objects is just the
//! unsizing coercion: `register_cast::<ConsoleLogger, dyn Logger>(|l| l)`.

use crate::value::{Bound, TypeSpec, Value};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type CastFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

#[derive(Clone)]
struct Cast {
  target: &'static str,
  apply: CastFn,
}

/// The cast table of a registry, keyed by the source instance type.
#[derive(Clone, Default)]
pub struct Casts {
  casts: HashMap<TypeId, Vec<Cast>>,
}

impl Casts {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes instances of `T` assignable to `Arc<U>` (and everything that
  /// accepts an `Arc<U>`, such as `Option<Arc<U>>`).
  pub fn register<T, U>(&mut self, cast: fn(Arc<T>) -> Arc<U>)
  where
    T: Send + Sync + 'static,
    U: ?Sized + Send + Sync + 'static,
  {
    let apply: CastFn = Arc::new(move |value: &Value| value.shared::<T>().map(|source| Value::new(cast(source))));
    let entry = Cast {
      target: type_name::<U>(),
      apply,
    };
    // Instances are stored either as `T` or, when injected pre-shared, as `Arc<T>`.
    for source in [TypeId::of::<T>(), TypeId::of::<Arc<T>>()] {
      self.casts.entry(source).or_default().push(entry.clone());
    }
  }

  /// Binds `value` to `expected`, directly if it is assignable or through the
  /// first registered cast whose result is.
  pub fn bind(&self, value: &Value, expected: &TypeSpec) -> Option<Bound> {
    if let Some(bound) = expected.bind(value) {
      return Some(bound);
    }
    self
      .casts
      .get(&value.type_id())?
      .iter()
      .find_map(|cast| (cast.apply)(value).and_then(|converted| expected.bind(&converted)))
  }

  pub fn len(&self) -> usize {
    self.casts.values().map(Vec::len).sum::<usize>() / 2
  }

  pub fn is_empty(&self) -> bool {
    self.casts.is_empty()
  }
}

impl fmt::Debug for Casts {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let targets: Vec<&str> = self
      .casts
      .values()
      .flat_map(|casts| casts.iter().map(|cast| cast.target))
      .collect();
    f.debug_struct("Casts").field("targets", &targets).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  trait Greeter: Send + Sync {
    fn greet(&self) -> String;
  }

  struct English;

  impl Greeter for English {
    fn greet(&self) -> String {
      "hello".to_string()
    }
  }

  #[test]
  fn casts_to_trait_objects() {
    let mut casts = Casts::new();
    casts.register::<English, dyn Greeter>(|english| english);
    assert_eq!(casts.len(), 1);

    let value = Value::new(English);
    let spec = TypeSpec::of::<Arc<dyn Greeter>>();
    let bound = casts.bind(&value, &spec).unwrap();
    let greeter = bound.downcast::<Arc<dyn Greeter>>().unwrap();
    assert_eq!(greeter.greet(), "hello");

    let optional = TypeSpec::of::<Option<Arc<dyn Greeter>>>();
    assert!(casts.bind(&value, &optional).is_some());
  }

  #[test]
  fn unregistered_casts_fail() {
    let casts = Casts::new();
    let spec = TypeSpec::of::<Arc<dyn Greeter>>();
    assert!(casts.bind(&Value::new(English), &spec).is_none());
  }
}
