use super::check_arguments;
use crate::argument::Arg;
use crate::callable::{Constructor, ErasedConstructor, Signature};
use crate::error::{Error, Result};
use crate::resolver::ParameterResolver;
use crate::value::{Bound, Value};
use std::fmt;
use std::sync::Arc;

/// Builds an instance by calling a constructor function with resolved arguments.
#[derive(Clone)]
pub struct FunctionFactory {
  signature: Signature,
  construct: ErasedConstructor,
  args: Vec<Arg>,
}

impl FunctionFactory {
  pub fn new<F, Args>(function: F, args: Vec<Arg>) -> Result<Self>
  where
    F: Constructor<Args>,
  {
    let signature = F::signature();
    if !signature.returns_value() {
      return Err(Error::invalid(format!(
        "the function {} does not return a value",
        signature
      )));
    }
    if !signature.accepts_arity(args.len()) {
      return Err(Error::invalid(format!(
        "invalid number of arguments for {}: got {} but expected {}",
        signature,
        args.len(),
        signature.expected_arity()
      )));
    }
    check_arguments(signature.name(), &args, |position| signature.param_for(position))?;

    Ok(Self {
      signature,
      construct: Arc::new(move |bound: Vec<Bound>| function.construct(bound)),
      args,
    })
  }

  pub fn signature(&self) -> &Signature {
    &self.signature
  }

  pub fn arguments(&self) -> &[Arg] {
    &self.args
  }

  pub fn generate(&self, resolver: &ParameterResolver<'_>) -> Result<Value> {
    let bound = resolver.resolve_arguments(&self.signature, &self.args, self.signature.name())?;
    (self.construct)(bound)
  }
}

impl fmt::Debug for FunctionFactory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FunctionFactory")
      .field("signature", &self.signature)
      .field("args", &self.args)
      .finish()
  }
}
