use super::check_arguments;
use crate::argument::Arg;
use crate::error::{Error, Result};
use crate::resolver::ParameterResolver;
use crate::value::{Bound, TypeSpec, Value};
use std::any::{type_name, TypeId};
use std::fmt;

/// A struct that can be assembled field by field.
///
/// Usually implemented through the `assemble!` macro. Fields are numbered in
/// declaration order; `assign` receives a value already converted to the
/// field's type.
pub trait Assemble: Default + Send + Sync + 'static {
  fn fields() -> Vec<FieldSpec>;

  fn assign(&mut self, index: usize, value: Bound) -> Result<()>;
}

/// Name and type of one field of an [`Assemble`] struct.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
  pub name: &'static str,
  pub spec: TypeSpec,
}

impl FieldSpec {
  pub fn new(name: &'static str, spec: TypeSpec) -> Self {
    Self { name, spec }
  }
}

/// Builds a struct from its default value, assigning the resolved arguments to
/// the leading fields in declaration order. Remaining fields keep their default.
#[derive(Clone)]
pub struct StructFactory {
  type_name: &'static str,
  output: TypeId,
  fields: Vec<FieldSpec>,
  assemble: fn(Vec<Bound>) -> Result<Value>,
  args: Vec<Arg>,
}

impl StructFactory {
  pub fn new<T: Assemble>(args: Vec<Arg>) -> Result<Self> {
    let fields = T::fields();
    if args.len() > fields.len() {
      return Err(Error::invalid(format!(
        "the struct {} has {} fields but {} arguments were given",
        type_name::<T>(),
        fields.len(),
        args.len()
      )));
    }
    check_arguments(type_name::<T>(), &args, |position| {
      fields.get(position).map(|field| field.spec)
    })?;

    Ok(Self {
      type_name: type_name::<T>(),
      output: TypeId::of::<T>(),
      fields,
      assemble: assemble::<T>,
      args,
    })
  }

  pub fn arguments(&self) -> &[Arg] {
    &self.args
  }

  pub fn fields(&self) -> &[FieldSpec] {
    &self.fields
  }

  pub fn output_type(&self) -> TypeId {
    self.output
  }

  pub fn generate(&self, resolver: &ParameterResolver<'_>) -> Result<Value> {
    let values = self
      .args
      .iter()
      .zip(&self.fields)
      .enumerate()
      .map(|(position, (arg, field))| {
        resolver
          .resolve(arg, &field.spec)
          .map_err(|source| Error::Argument {
            target: format!("{}.{}", self.type_name, field.name),
            position,
            source: Box::new(source),
          })
      })
      .collect::<Result<Vec<_>>>()?;
    (self.assemble)(values)
  }
}

fn assemble<T: Assemble>(values: Vec<Bound>) -> Result<Value> {
  let mut instance = T::default();
  for (index, value) in values.into_iter().enumerate() {
    instance.assign(index, value)?;
  }
  Ok(Value::new(instance))
}

impl fmt::Debug for StructFactory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StructFactory")
      .field("type", &self.type_name)
      .field("fields", &self.fields)
      .field("args", &self.args)
      .finish()
  }
}
