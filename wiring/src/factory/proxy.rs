use crate::argument::Arg;
use crate::callable::is_exported;
use crate::error::{Error, Result};
use crate::reference;
use crate::resolver::ParameterResolver;
use crate::value::Value;

/// Builds an instance by calling an exported method on another registered
/// instance: `@target::Method(args..)`.
#[derive(Debug, Clone)]
pub struct ProxyFactory {
  target: String,
  method: String,
  args: Vec<Arg>,
}

impl ProxyFactory {
  pub fn new(target: &str, method: &str, args: Vec<Arg>) -> Result<Self> {
    let target = target.strip_prefix('@').unwrap_or(target);
    if target.is_empty() {
      return Err(Error::invalid("a proxy needs a target type id"));
    }
    if !is_exported(method) {
      return Err(Error::invalid(format!(
        "can not use unexported method \"{}\" as proxy method of \"@{}\"",
        method, target
      )));
    }
    Ok(Self {
      target: target.to_string(),
      method: method.to_string(),
      args,
    })
  }

  pub fn target(&self) -> &str {
    &self.target
  }

  pub fn method(&self) -> &str {
    &self.method
  }

  /// `["@target", args..]`, so the target participates in graph validation.
  pub fn arguments(&self) -> Vec<Arg> {
    let mut arguments = Vec::with_capacity(self.args.len() + 1);
    arguments.push(Arg::Text(reference::type_reference(&self.target)));
    arguments.extend(self.args.iter().cloned());
    arguments
  }

  pub fn generate(&self, resolver: &ParameterResolver<'_>) -> Result<Value> {
    let selector = format!("@{}::{}", self.target, self.method);
    let instance = resolver.instance_of(&self.target)?;
    let method = resolver.method_of(&instance, &selector, &self.method)?;
    let bound = resolver.resolve_arguments(method.signature(), &self.args, &selector)?;
    method.invoke(&instance, bound)
  }
}
