use super::Factory;
use crate::value::Value;

/// Returns a pre-built instance. Every generation yields the same instance.
#[derive(Debug, Clone)]
pub struct InstanceFactory {
  value: Value,
}

impl InstanceFactory {
  pub fn new<T: Send + Sync + 'static>(instance: T) -> Self {
    Self {
      value: Value::wrap(instance),
    }
  }

  /// An instance factory for `value`, or the invalid sentinel if there is none.
  pub fn from_value(value: Option<Value>) -> Factory {
    match value {
      Some(value) => Factory::Instance(Self { value }),
      None => Factory::invalid("an instance factory needs an instance, got none"),
    }
  }

  pub fn value(&self) -> &Value {
    &self.value
  }

  pub fn generate(&self) -> Value {
    self.value.clone()
  }
}

impl From<Value> for InstanceFactory {
  fn from(value: Value) -> Self {
    Self { value }
  }
}
