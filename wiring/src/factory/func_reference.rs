use crate::argument::Arg;
use crate::callable::is_exported;
use crate::error::{Error, Result};
use crate::reference;
use crate::resolver::ParameterResolver;
use crate::value::Value;

/// Produces an exported method of another registered instance, bound to that
/// instance, as an `Arc<dyn Fn(..) -> R + Send + Sync>`.
#[derive(Debug, Clone)]
pub struct FuncReferenceFactory {
  target: String,
  method: String,
}

impl FuncReferenceFactory {
  pub fn new(target: &str, method: &str) -> Result<Self> {
    let target = target.strip_prefix('@').unwrap_or(target);
    if target.is_empty() {
      return Err(Error::invalid("a function reference needs a target type id"));
    }
    if !is_exported(method) {
      return Err(Error::invalid(format!(
        "can not use unexported method \"{}\" as function reference of \"@{}\"",
        method, target
      )));
    }
    Ok(Self {
      target: target.to_string(),
      method: method.to_string(),
    })
  }

  pub fn target(&self) -> &str {
    &self.target
  }

  pub fn method(&self) -> &str {
    &self.method
  }

  pub fn arguments(&self) -> Vec<Arg> {
    vec![Arg::Text(reference::type_reference(&self.target))]
  }

  pub fn generate(&self, resolver: &ParameterResolver<'_>) -> Result<Value> {
    let selector = format!("@{}::{}", self.target, self.method);
    let instance = resolver.instance_of(&self.target)?;
    resolver.method_of(&instance, &selector, &self.method)?.bind(&instance)
  }
}
