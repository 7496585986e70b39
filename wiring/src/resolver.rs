//! Turns raw factory arguments into typed values.

use crate::argument::Arg;
use crate::callable::{Method, Signature};
use crate::container::{Container, ParameterPolicy};
use crate::error::{Error, Result};
use crate::reference::{self, TypeRef};
use crate::value::{Bound, TypeSpec, Value};
use tracing::warn;

/// Resolves `%parameter%` placeholders against the container's config and
/// `@type` references against the container itself, building referenced types
/// on demand.
#[derive(Clone, Copy)]
pub struct ParameterResolver<'c> {
  container: &'c Container,
}

impl<'c> ParameterResolver<'c> {
  pub fn new(container: &'c Container) -> Self {
    Self { container }
  }

  pub fn container(&self) -> &'c Container {
    self.container
  }

  /// Resolves one raw argument to the type described by `expected`.
  ///
  /// Text that is neither a parameter nor a type reference is used verbatim.
  pub fn resolve(&self, raw: &Arg, expected: &TypeSpec) -> Result<Bound> {
    match raw {
      Arg::Literal(value) => self.bind(value, expected, || format!("literal {:?}", value)),
      Arg::Text(text) => {
        if let Some(name) = reference::parameter_name(text) {
          return self.resolve_parameter(text, name, expected);
        }
        if let Some(type_ref) = TypeRef::parse(text) {
          return self.resolve_reference(&type_ref, expected);
        }
        self.bind(&Value::new(text.clone()), expected, || format!("literal {:?}", text))
      }
    }
  }

  /// Resolves a full argument list against `signature`. Trailing arguments of
  /// a variadic signature are collected into its last parameter.
  pub fn resolve_arguments(&self, signature: &Signature, raw: &[Arg], target: &str) -> Result<Vec<Bound>> {
    if !signature.accepts_arity(raw.len()) {
      return Err(Error::Arity {
        target: target.to_string(),
        expected: signature.expected_arity(),
        actual: raw.len(),
      });
    }

    let params = signature.params();
    let fixed = if signature.is_variadic() { params.len() - 1 } else { params.len() };
    let at = |position: usize| {
      move |source: Error| Error::Argument {
        target: target.to_string(),
        position,
        source: Box::new(source),
      }
    };

    let mut bound = Vec::with_capacity(params.len());
    for (position, (arg, param)) in raw.iter().zip(params).take(fixed).enumerate() {
      bound.push(self.resolve(arg, param).map_err(at(position))?);
    }

    if signature.is_variadic() {
      let variadic = &params[fixed];
      let mut items = Vec::with_capacity(raw.len() - fixed);
      if let Some(element) = variadic.element() {
        for (offset, arg) in raw[fixed..].iter().enumerate() {
          items.push(self.resolve(arg, &element).map_err(at(fixed + offset))?);
        }
      }
      let collected = variadic.collect(items).ok_or_else(|| Error::TypeMismatch {
        subject: format!("variadic arguments of {}", target),
        actual: "mixed".to_string(),
        expected: variadic.name().to_string(),
      })?;
      bound.push(collected);
    }

    Ok(bound)
  }

  /// The instance registered as `id`, built if necessary.
  pub fn instance_of(&self, id: &str) -> Result<Value> {
    self
      .container
      .lookup(id)?
      .ok_or_else(|| Error::UnknownTypeReference { id: id.to_string() })
  }

  /// The exported method `name` on the runtime type of `instance`.
  pub fn method_of(&self, instance: &Value, selector: &str, name: &str) -> Result<Method> {
    self
      .container
      .registry()
      .methods()
      .find(instance.type_id(), name)
      .cloned()
      .ok_or_else(|| Error::MethodNotFound {
        reference: selector.to_string(),
        type_name: instance.type_name().to_string(),
      })
  }

  fn resolve_parameter(&self, text: &str, name: &str, expected: &TypeSpec) -> Result<Bound> {
    match self.container.config().get(name) {
      Some(value) => self.bind(value, expected, || format!("parameter \"{}\"", text)),
      None => match self.container.parameter_policy() {
        ParameterPolicy::Strict => Err(Error::UndefinedParameter {
          name: name.to_string(),
        }),
        ParameterPolicy::Passthrough => {
          warn!(parameter = name, "parameter is not configured, passing the placeholder through");
          self.bind(&Value::new(text.to_string()), expected, || {
            format!("unconfigured parameter \"{}\"", text)
          })
        }
      },
    }
  }

  fn resolve_reference(&self, type_ref: &TypeRef, expected: &TypeSpec) -> Result<Bound> {
    let Some(instance) = self.container.lookup(&type_ref.id)? else {
      if !type_ref.optional {
        return Err(Error::UnknownTypeReference {
          id: type_ref.id.clone(),
        });
      }
      return expected.zero().ok_or_else(|| Error::NoZeroValue {
        reference: type_ref.raw.clone(),
        expected: expected.name().to_string(),
      });
    };

    let subject = || format!("the referenced type \"{}\"", type_ref);
    match &type_ref.method {
      Some(name) => {
        let method = self.method_of(&instance, &type_ref.raw, name)?;
        self.bind(&method.bind(&instance)?, expected, subject)
      }
      None => self.bind(&instance, expected, subject),
    }
  }

  fn bind(&self, value: &Value, expected: &TypeSpec, subject: impl FnOnce() -> String) -> Result<Bound> {
    self
      .container
      .registry()
      .casts()
      .bind(value, expected)
      .ok_or_else(|| Error::TypeMismatch {
        subject: subject(),
        actual: value.type_name().to_string(),
        expected: expected.name().to_string(),
      })
  }
}
