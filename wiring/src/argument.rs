//! Raw, unresolved factory arguments.

use crate::reference::{self, TypeRef};
use crate::value::Value;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One raw argument of a factory descriptor.
///
/// Text may be a placeholder (`%param%`, `@type`, `@?type`, `@type::Method`) and
/// is only interpreted when the argument is resolved. Anything else is a
/// literal that is checked against the expected type on resolution.
#[derive(Clone)]
pub enum Arg {
  Text(String),
  Literal(Value),
}

impl Arg {
  pub fn literal<T: Send + Sync + 'static>(value: T) -> Self {
    Arg::Literal(Value::wrap(value))
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Arg::Text(text) => Some(text),
      Arg::Literal(_) => None,
    }
  }

  /// The parsed type reference, if this argument is one.
  pub fn type_reference(&self) -> Option<TypeRef> {
    self.as_text().and_then(TypeRef::parse)
  }

  pub fn is_placeholder(&self) -> bool {
    self
      .as_text()
      .map_or(false, reference::is_parameter_or_type_reference)
  }
}

impl fmt::Debug for Arg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Arg::Text(text) => write!(f, "{:?}", text),
      Arg::Literal(value) => write!(f, "{:?}", value),
    }
  }
}

impl PartialEq for Arg {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Arg::Text(left), Arg::Text(right)) => left == right,
      (Arg::Literal(left), Arg::Literal(right)) => left.ptr_eq(right),
      _ => false,
    }
  }
}

impl From<&str> for Arg {
  fn from(text: &str) -> Self {
    Arg::Text(text.to_string())
  }
}

impl From<String> for Arg {
  fn from(text: String) -> Self {
    Arg::Text(text)
  }
}

impl From<Value> for Arg {
  fn from(value: Value) -> Self {
    Arg::Literal(value)
  }
}

macro_rules! literal_arg {
  ($($ty:ty),*) => {
    $(
      impl From<$ty> for Arg {
        fn from(value: $ty) -> Self {
          Arg::literal(value)
        }
      }
    )*
  };
}

literal_arg!(
  bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
  Duration, PathBuf
);
