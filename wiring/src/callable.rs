//! Typed constructors and methods, erased behind uniform signatures.
//!
//! Any `Fn(P1, .., Pn) -> R` (n <= 8) whose parameters implement [`Param`] is a
//! [`Constructor`]; any `Fn(&Recv, P1, .., Pn) -> R` can be registered as an
//! exported method. Both describe their parameters with a [`Signature`] so the
//! resolver can bind raw arguments before the call.

use crate::error::{Error, Result};
use crate::value::{unbox, Bound, Param, TypeSpec, Value};
use std::any::{type_name, TypeId};
use std::fmt;
use std::sync::Arc;

/// Parameter and return types of a constructor or method.
#[derive(Clone)]
pub struct Signature {
  name: String,
  params: Vec<TypeSpec>,
  output: TypeId,
  output_name: &'static str,
}

impl Signature {
  pub(crate) fn new<Out: 'static>(name: &str, params: Vec<TypeSpec>) -> Self {
    Self {
      name: short_name(name).to_string(),
      params,
      output: TypeId::of::<Out>(),
      output_name: type_name::<Out>(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn params(&self) -> &[TypeSpec] {
    &self.params
  }

  pub fn output(&self) -> TypeId {
    self.output
  }

  pub fn output_name(&self) -> &'static str {
    self.output_name
  }

  pub fn returns_value(&self) -> bool {
    self.output != TypeId::of::<()>()
  }

  /// True if the last parameter is a `Variadic<T>`.
  pub fn is_variadic(&self) -> bool {
    self.params.last().map_or(false, TypeSpec::is_variadic)
  }

  /// The number of raw arguments this signature accepts, as text for diagnostics.
  pub fn expected_arity(&self) -> String {
    if self.is_variadic() {
      format!("at least {}", self.params.len() - 1)
    } else {
      self.params.len().to_string()
    }
  }

  pub fn accepts_arity(&self, count: usize) -> bool {
    if self.is_variadic() {
      count + 1 >= self.params.len()
    } else {
      count == self.params.len()
    }
  }

  /// The type the raw argument at `index` is resolved against. Trailing
  /// arguments of a variadic signature resolve against the element type.
  pub fn param_for(&self, index: usize) -> Option<TypeSpec> {
    let last = self.params.len().checked_sub(1)?;
    if self.is_variadic() && index >= last {
      self.params[last].element()
    } else {
      self.params.get(index).copied()
    }
  }
}

impl fmt::Display for Signature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let params: Vec<&str> = self.params.iter().map(TypeSpec::name).collect();
    write!(f, "{}({})", self.name, params.join(", "))
  }
}

impl fmt::Debug for Signature {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} -> {}", self, self.output_name)
  }
}

// `my_crate::services::new_logger` -> `new_logger`
fn short_name(name: &str) -> &str {
  let base = name.split('<').next().unwrap_or(name);
  match base.rfind("::") {
    Some(index) if !base.ends_with("{{closure}}") => &name[index + 2..],
    _ => name,
  }
}

pub(crate) type ErasedConstructor = Arc<dyn Fn(Vec<Bound>) -> Result<Value> + Send + Sync>;

/// A function that builds an instance from typed parameters.
///
/// Implemented for every `Fn(P1, .., Pn) -> R + Send + Sync + 'static` with
/// `n <= 8`, where each `Pi: Param`.
pub trait Constructor<Args>: Send + Sync + 'static {
  fn signature() -> Signature;

  fn construct(&self, args: Vec<Bound>) -> Result<Value>;
}

/// A single exported method, erased over its receiver and parameter types.
#[derive(Clone)]
pub struct Method {
  name: String,
  receiver: &'static str,
  signature: Signature,
  invoke: Arc<dyn Fn(&Value, Vec<Bound>) -> Result<Value> + Send + Sync>,
  bind: Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>,
}

impl Method {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn receiver(&self) -> &'static str {
    self.receiver
  }

  pub fn signature(&self) -> &Signature {
    &self.signature
  }

  /// Calls the method on `receiver` with already bound arguments.
  pub fn invoke(&self, receiver: &Value, args: Vec<Bound>) -> Result<Value> {
    (self.invoke)(receiver, args)
  }

  /// Binds the method to `receiver`. The result is a
  /// `Arc<dyn Fn(P1, .., Pn) -> R + Send + Sync>` value.
  pub fn bind(&self, receiver: &Value) -> Result<Value> {
    (self.bind)(receiver)
  }
}

impl fmt::Debug for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Method")
      .field("name", &self.name)
      .field("receiver", &self.receiver)
      .field("signature", &self.signature)
      .finish()
  }
}

/// Converts a typed `Fn(&Recv, P1, .., Pn) -> R` into a [`Method`].
pub trait IntoMethod<Recv, Args>: Send + Sync + 'static {
  fn into_method(self, name: &str) -> Method;
}

fn receiver_of<Recv: Send + Sync + 'static>(receiver: &Value, method: &str) -> Result<Arc<Recv>> {
  receiver
    .shared::<Recv>()
    .ok_or_else(|| Error::TypeMismatch {
      subject: format!("receiver of method \"{}\"", method),
      actual: receiver.type_name().to_string(),
      expected: type_name::<Recv>().to_string(),
    })
}

macro_rules! impl_callables {
  ($($arg:ident),*) => {
    impl<Func, Out, $($arg,)*> Constructor<($($arg,)*)> for Func
    where
      Func: Fn($($arg),*) -> Out + Send + Sync + 'static,
      Out: Send + Sync + 'static,
      $($arg: Param,)*
    {
      fn signature() -> Signature {
        Signature::new::<Out>(type_name::<Func>(), vec![$(TypeSpec::of::<$arg>()),*])
      }

      #[allow(non_snake_case, unused_mut, unused_variables)]
      fn construct(&self, args: Vec<Bound>) -> Result<Value> {
        const ARITY: &[&str] = &[$(stringify!($arg)),*];
        let target = type_name::<Func>();
        let mut args = Arguments::new(args, ARITY.len(), target);
        $(
          let $arg = unbox::<$arg>(args.next_bound()?, target)?;
        )*
        Ok(Value::new((self)($($arg),*)))
      }
    }

    impl<Func, Recv, Out, $($arg,)*> IntoMethod<Recv, ($($arg,)*)> for Func
    where
      Func: Fn(&Recv, $($arg),*) -> Out + Send + Sync + 'static,
      Recv: Send + Sync + 'static,
      Out: Send + Sync + 'static,
      $($arg: Param,)*
    {
      #[allow(non_snake_case, unused_mut, unused_variables)]
      fn into_method(self, name: &str) -> Method {
        let signature = Signature::new::<Out>(name, vec![$(TypeSpec::of::<$arg>()),*]);
        const ARITY: &[&str] = &[$(stringify!($arg)),*];
        let func = Arc::new(self);

        let invoke_func = Arc::clone(&func);
        let invoke_name = name.to_string();
        let invoke = move |receiver: &Value, args: Vec<Bound>| -> Result<Value> {
          let this = receiver_of::<Recv>(receiver, &invoke_name)?;
          let mut args = Arguments::new(args, ARITY.len(), &invoke_name);
          $(
            let $arg = unbox::<$arg>(args.next_bound()?, &invoke_name)?;
          )*
          Ok(Value::new((*invoke_func)(&*this, $($arg),*)))
        };

        let bind_name = name.to_string();
        let bind = move |receiver: &Value| -> Result<Value> {
          let this = receiver_of::<Recv>(receiver, &bind_name)?;
          let func = Arc::clone(&func);
          let bound: Arc<dyn Fn($($arg),*) -> Out + Send + Sync> =
            Arc::new(move |$($arg: $arg),*| (*func)(&*this, $($arg),*));
          Ok(Value::new(bound))
        };

        Method {
          name: name.to_string(),
          receiver: type_name::<Recv>(),
          signature,
          invoke: Arc::new(invoke),
          bind: Arc::new(bind),
        }
      }
    }
  };
}

// Hands out bound arguments one by one, reporting the real counts on a shortfall.
struct Arguments<'a> {
  args: std::vec::IntoIter<Bound>,
  expected: usize,
  supplied: usize,
  target: &'a str,
}

impl<'a> Arguments<'a> {
  fn new(args: Vec<Bound>, expected: usize, target: &'a str) -> Self {
    Self {
      supplied: args.len(),
      args: args.into_iter(),
      expected,
      target,
    }
  }

  fn next_bound(&mut self) -> Result<Bound> {
    self.args.next().ok_or_else(|| Error::Arity {
      target: self.target.to_string(),
      expected: self.expected.to_string(),
      actual: self.supplied,
    })
  }
}

impl_callables!();
impl_callables!(A1);
impl_callables!(A1, A2);
impl_callables!(A1, A2, A3);
impl_callables!(A1, A2, A3, A4);
impl_callables!(A1, A2, A3, A4, A5);
impl_callables!(A1, A2, A3, A4, A5, A6);
impl_callables!(A1, A2, A3, A4, A5, A6, A7);
impl_callables!(A1, A2, A3, A4, A5, A6, A7, A8);

/// Method names starting with an alphabetic character and made of
/// alphanumerics and `_` are exported. A leading `_` marks a private method.
pub fn is_exported(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if first.is_alphabetic() => chars.all(|c| c.is_alphanumeric() || c == '_'),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::value::Variadic;

  #[test]
  fn variadic_signature() {
    let signature = <fn(u32, Variadic<String>) -> String as Constructor<(u32, Variadic<String>)>>::signature();
    assert!(signature.is_variadic());
    assert!(signature.accepts_arity(1));
    assert!(signature.accepts_arity(4));
    assert!(!signature.accepts_arity(0));
    assert_eq!(signature.expected_arity(), "at least 1");
    assert_eq!(signature.param_for(3).unwrap(), TypeSpec::of::<String>());
    assert_eq!(signature.param_for(0).unwrap(), TypeSpec::of::<u32>());
  }

  #[test]
  fn missing_bound_arguments_report_counts() {
    fn pair(left: u32, right: String) -> String {
      format!("{}{}", left, right)
    }

    let error = Constructor::<(u32, String)>::construct(&pair, vec![Box::new(1_u32) as Bound]).unwrap_err();
    assert!(
      matches!(error, Error::Arity { ref expected, actual, .. } if expected == "2" && actual == 1),
      "{}",
      error
    );
  }

  #[test]
  fn exported_names() {
    assert!(is_exported("GetLogger"));
    assert!(is_exported("get_logger"));
    assert!(!is_exported("_get_logger"));
    assert!(!is_exported(""));
    assert!(!is_exported("get-logger"));
  }

  #[test]
  fn short_names() {
    assert_eq!(short_name("app::services::new_logger"), "new_logger");
    assert_eq!(short_name("new_logger"), "new_logger");
  }
}
