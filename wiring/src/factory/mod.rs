//! Factory descriptors: the recipes the container uses to build instances.
//!
//! A [`Factory`] is immutable once created. Construction validates what can be
//! checked up front (arity, exported method names, optional references against
//! types without a zero value); a failed check yields [`Factory::Invalid`],
//! which carries the diagnostic and fails every time it is generated. This
//! keeps bulk registration from aborting half way.

mod func_reference;
mod function;
mod instance;
mod proxy;
mod structure;

pub use func_reference::FuncReferenceFactory;
pub use function::FunctionFactory;
pub use instance::InstanceFactory;
pub use proxy::ProxyFactory;
pub use structure::{Assemble, FieldSpec, StructFactory};

use crate::argument::Arg;
use crate::callable::Constructor;
use crate::error::{Error, Result};
use crate::reference::{self, TypeRef};
use crate::resolver::ParameterResolver;
use crate::value::{TypeSpec, Value};
use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

#[derive(Clone)]
pub enum Factory {
  Function(FunctionFactory),
  Struct(StructFactory),
  Proxy(ProxyFactory),
  FuncReference(FuncReferenceFactory),
  Instance(InstanceFactory),
  /// A descriptor that failed validation. Generating it always fails.
  Invalid(String),
}

impl Factory {
  /// A [`FunctionFactory`], or the invalid sentinel if `function` cannot be
  /// called with `args`.
  pub fn function<F, Args>(function: F, args: Vec<Arg>) -> Self
  where
    F: Constructor<Args>,
  {
    FunctionFactory::new(function, args).map_or_else(Factory::from_error, Factory::Function)
  }

  /// A [`StructFactory`] assembling `T` from `args`, or the invalid sentinel.
  pub fn structure<T: Assemble>(args: Vec<Arg>) -> Self {
    StructFactory::new::<T>(args).map_or_else(Factory::from_error, Factory::Struct)
  }

  pub fn proxy(target: &str, method: &str, args: Vec<Arg>) -> Self {
    ProxyFactory::new(target, method, args).map_or_else(Factory::from_error, Factory::Proxy)
  }

  pub fn func_reference(target: &str, method: &str) -> Self {
    FuncReferenceFactory::new(target, method).map_or_else(Factory::from_error, Factory::FuncReference)
  }

  pub fn instance<T: Send + Sync + 'static>(instance: T) -> Self {
    Factory::Instance(InstanceFactory::new(instance))
  }

  pub fn invalid(reason: impl Into<String>) -> Self {
    Factory::Invalid(reason.into())
  }

  fn from_error(error: Error) -> Self {
    match error {
      Error::InvalidFactory { reason } => Factory::Invalid(reason),
      other => Factory::Invalid(other.to_string()),
    }
  }

  /// The raw, unresolved arguments, as seen by the validator.
  pub fn arguments(&self) -> Vec<Arg> {
    match self {
      Factory::Function(factory) => factory.arguments().to_vec(),
      Factory::Struct(factory) => factory.arguments().to_vec(),
      Factory::Proxy(factory) => factory.arguments(),
      Factory::FuncReference(factory) => factory.arguments(),
      Factory::Instance(_) | Factory::Invalid(_) => Vec::new(),
    }
  }

  pub fn generate(&self, resolver: &ParameterResolver<'_>) -> Result<Value> {
    match self {
      Factory::Function(factory) => factory.generate(resolver),
      Factory::Struct(factory) => factory.generate(resolver),
      Factory::Proxy(factory) => factory.generate(resolver),
      Factory::FuncReference(factory) => factory.generate(resolver),
      Factory::Instance(factory) => Ok(factory.generate()),
      Factory::Invalid(reason) => Err(Error::invalid(reason.clone())),
    }
  }

  pub fn is_valid(&self) -> bool {
    !matches!(self, Factory::Invalid(_))
  }

  pub fn invalid_reason(&self) -> Option<&str> {
    match self {
      Factory::Invalid(reason) => Some(reason),
      _ => None,
    }
  }

  /// The type this factory produces, when it is known without generating it.
  /// Proxies and function references only know their output at runtime.
  pub fn output_type(&self) -> Option<TypeId> {
    match self {
      Factory::Function(factory) => Some(factory.signature().output()),
      Factory::Struct(factory) => Some(factory.output_type()),
      Factory::Instance(factory) => Some(factory.value().type_id()),
      Factory::Proxy(_) | Factory::FuncReference(_) | Factory::Invalid(_) => None,
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Factory::Function(_) => "function",
      Factory::Struct(_) => "struct",
      Factory::Proxy(_) => "proxy",
      Factory::FuncReference(_) => "func_reference",
      Factory::Instance(_) => "instance",
      Factory::Invalid(_) => "invalid",
    }
  }
}

impl fmt::Debug for Factory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Factory::Function(factory) => fmt::Debug::fmt(factory, f),
      Factory::Struct(factory) => fmt::Debug::fmt(factory, f),
      Factory::Proxy(factory) => fmt::Debug::fmt(factory, f),
      Factory::FuncReference(factory) => fmt::Debug::fmt(factory, f),
      Factory::Instance(factory) => fmt::Debug::fmt(factory, f),
      Factory::Invalid(reason) => f.debug_tuple("Invalid").field(reason).finish(),
    }
  }
}

macro_rules! factory_from {
  ($($variant:ident($ty:ty)),*) => {
    $(
      impl From<$ty> for Factory {
        fn from(factory: $ty) -> Self {
          Factory::$variant(factory)
        }
      }
    )*
  };
}

factory_from!(
  Function(FunctionFactory),
  Struct(StructFactory),
  Proxy(ProxyFactory),
  FuncReference(FuncReferenceFactory),
  Instance(InstanceFactory)
);

/// Marker for shapes registered as function factories.
pub struct FnShape<Args>(PhantomData<Args>);

/// Marker for shapes registered as struct factories.
pub struct StructShape;

/// Anything `TypeRegistry::register_type` can turn into a factory: a
/// constructor function, or a prototype value of an [`Assemble`] struct (only
/// its type is used).
pub trait IntoFactory<Marker> {
  fn into_factory(self, args: Vec<Arg>) -> Factory;
}

impl<F, Args> IntoFactory<FnShape<Args>> for F
where
  F: Constructor<Args>,
{
  fn into_factory(self, args: Vec<Arg>) -> Factory {
    Factory::function(self, args)
  }
}

impl<T: Assemble> IntoFactory<StructShape> for T {
  fn into_factory(self, args: Vec<Arg>) -> Factory {
    Factory::structure::<T>(args)
  }
}

// Rejects raw arguments that can never resolve against their parameter type.
pub(crate) fn check_arguments(
  target: &str,
  args: &[Arg],
  spec_for: impl Fn(usize) -> Option<TypeSpec>,
) -> Result<()> {
  for (position, arg) in args.iter().enumerate() {
    let (Some(spec), Arg::Text(text)) = (spec_for(position), arg) else {
      continue;
    };
    if let Some(type_ref) = TypeRef::parse(text) {
      if type_ref.optional && !spec.has_zero() {
        return Err(Error::invalid(format!(
          "argument {} of {}: the optional reference \"{}\" needs a parameter type with a zero value, but {} has none",
          position,
          target,
          type_ref,
          spec.name()
        )));
      }
    } else if !reference::is_parameter(text) && spec.bind(&Value::new(text.clone())).is_none() {
      return Err(Error::invalid(format!(
        "argument {} of {}: the literal {:?} can not be used as {}",
        position,
        target,
        text,
        spec.name()
      )));
    }
  }
  Ok(())
}
