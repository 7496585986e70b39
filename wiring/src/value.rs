//! Type-erased instances and the runtime description of expected types.
//!
//! Every instance that flows through the container is a [`Value`]. Constructor
//! parameters, struct fields and method arguments describe what they expect with
//! a [`TypeSpec`], built from the [`Param`] implementation of the parameter type.
//! The assignability check between the two is explicit: `Param::from_value`.

use crate::error::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A resolved argument, already converted to the type its parameter expects.
pub type Bound = Box<dyn Any + Send>;

/// A shared, type-erased instance.
///
/// Cloning a `Value` never clones the instance: all clones point at the same
/// allocation, which is what gives the container its singleton semantics.
#[derive(Clone)]
pub struct Value {
  object: Arc<dyn Any + Send + Sync>,
  // The same allocation seen as `Arc<T>`, so `Arc<T>` parameters can share it.
  shared: Arc<dyn Any + Send + Sync>,
  type_name: &'static str,
}

impl Value {
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  /// Like [`Value::new`], but returns `instance` itself if it already is a `Value`.
  pub fn wrap<T: Any + Send + Sync>(instance: T) -> Self {
    let existing = (&instance as &dyn Any).downcast_ref::<Value>().cloned();
    existing.unwrap_or_else(|| Self::new(instance))
  }

  /// Wraps an existing allocation without copying it; `Arc<T>` lookups on the
  /// resulting value return clones of `value`.
  pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      shared: Arc::new(value.clone()),
      object: value,
      type_name: type_name::<T>(),
    }
  }

  /// The `TypeId` of the concrete type stored in this value.
  pub fn type_id(&self) -> TypeId {
    (*self.object).type_id()
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub fn is<T: Any>(&self) -> bool {
    self.object.is::<T>()
  }

  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.object.downcast_ref::<T>()
  }

  /// Returns the instance as a shared `Arc<T>`.
  ///
  /// Works when the value stores a `T` (the returned `Arc` is the value's own
  /// allocation) and when it stores an `Arc<T>` directly, which is how trait
  /// objects (`Arc<dyn Trait>`) are kept.
  pub fn shared<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
    self
      .shared
      .downcast_ref::<Arc<T>>()
      .cloned()
      .or_else(|| self.object.downcast_ref::<Arc<T>>().cloned())
  }

  /// True if both values point at the same instance.
  pub fn ptr_eq(&self, other: &Value) -> bool {
    Arc::ptr_eq(&self.object, &other.object)
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Value").field(&self.type_name).finish()
  }
}

/// A type that can receive a resolved argument: constructor parameters, struct
/// fields and method arguments all implement `Param`.
///
/// `from_value` is the assignability predicate. It returns `None` when the
/// value cannot be used as `Self`; it may also coerce (integer widening,
/// `&'static str` to `String`, ...).
pub trait Param: Sized + Send + Sync + 'static {
  fn from_value(value: &Value) -> Option<Self>;

  /// The value an undefined optional reference (`@?id`) resolves to.
  /// Types without a meaningful zero value return `None`.
  fn zero() -> Option<Self> {
    None
  }

  #[doc(hidden)]
  fn variadic() -> Option<VariadicSpec> {
    None
  }
}

/// Runtime description of an expected type.
#[derive(Clone, Copy)]
pub struct TypeSpec {
  id: TypeId,
  name: &'static str,
  bind: fn(&Value) -> Option<Bound>,
  zero: fn() -> Option<Bound>,
  variadic: Option<VariadicSpec>,
}

#[doc(hidden)]
#[derive(Clone, Copy)]
pub struct VariadicSpec {
  element: fn() -> TypeSpec,
  collect: fn(Vec<Bound>) -> Option<Bound>,
}

impl TypeSpec {
  pub fn of<P: Param>() -> Self {
    Self {
      id: TypeId::of::<P>(),
      name: type_name::<P>(),
      bind: |value| P::from_value(value).map(|param| Box::new(param) as Bound),
      zero: || P::zero().map(|param| Box::new(param) as Bound),
      variadic: P::variadic(),
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Converts `value` into this type, or returns `None` if it is not assignable.
  pub fn bind(&self, value: &Value) -> Option<Bound> {
    (self.bind)(value)
  }

  pub fn zero(&self) -> Option<Bound> {
    (self.zero)()
  }

  pub fn has_zero(&self) -> bool {
    self.zero().is_some()
  }

  /// True for `Variadic<T>`, which swallows all trailing arguments.
  pub fn is_variadic(&self) -> bool {
    self.variadic.is_some()
  }

  /// The element type of a variadic parameter.
  pub fn element(&self) -> Option<TypeSpec> {
    self.variadic.map(|variadic| (variadic.element)())
  }

  pub(crate) fn collect(&self, items: Vec<Bound>) -> Option<Bound> {
    self.variadic.and_then(|variadic| (variadic.collect)(items))
  }
}

impl fmt::Debug for TypeSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

impl PartialEq for TypeSpec {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

/// Takes a bound argument back out of its box.
#[doc(hidden)]
pub fn unbox<P: Param>(bound: Bound, target: &str) -> Result<P> {
  bound
    .downcast::<P>()
    .map(|param| *param)
    .map_err(|_| Error::TypeMismatch {
      subject: format!("bound argument for {}", target),
      actual: "unknown".to_string(),
      expected: type_name::<P>().to_string(),
    })
}

/// The trailing parameter of a variadic constructor or method.
///
/// A function `fn(u32, Variadic<String>) -> T` accepts one fixed argument plus
/// any number of trailing string arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Variadic<T>(pub Vec<T>);

impl<T> Variadic<T> {
  pub fn into_inner(self) -> Vec<T> {
    self.0
  }
}

impl<T> Deref for Variadic<T> {
  type Target = [T];

  fn deref(&self) -> &[T] {
    &self.0
  }
}

impl<T: Param> Param for Variadic<T> {
  fn from_value(value: &Value) -> Option<Self> {
    value
      .downcast_ref::<Vec<Value>>()?
      .iter()
      .map(T::from_value)
      .collect::<Option<Vec<T>>>()
      .map(Variadic)
  }

  fn zero() -> Option<Self> {
    Some(Variadic(Vec::new()))
  }

  fn variadic() -> Option<VariadicSpec> {
    Some(VariadicSpec {
      element: TypeSpec::of::<T>,
      collect: |items| {
        items
          .into_iter()
          .map(|item| item.downcast::<T>().ok().map(|element| *element))
          .collect::<Option<Vec<T>>>()
          .map(|elements| Box::new(Variadic(elements)) as Bound)
      },
    })
  }
}

// --- Param implementations ---

fn integer_of(value: &Value) -> Option<i128> {
  macro_rules! widen {
    ($($ty:ty),*) => {
      $(
        if let Some(number) = value.downcast_ref::<$ty>() {
          return Some(*number as i128);
        }
      )*
    };
  }
  widen!(i64, u64, i32, u32, usize, isize, i16, u16, i8, u8, i128);
  value
    .downcast_ref::<u128>()
    .and_then(|number| i128::try_from(*number).ok())
}

macro_rules! integer_param {
  ($($ty:ty),*) => {
    $(
      impl Param for $ty {
        fn from_value(value: &Value) -> Option<Self> {
          if let Some(exact) = value.downcast_ref::<$ty>() {
            return Some(*exact);
          }
          integer_of(value).and_then(|wide| <$ty>::try_from(wide).ok())
        }

        fn zero() -> Option<Self> {
          Some(0)
        }
      }
    )*
  };
}

integer_param!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Param for f64 {
  fn from_value(value: &Value) -> Option<Self> {
    if let Some(exact) = value.downcast_ref::<f64>() {
      return Some(*exact);
    }
    if let Some(single) = value.downcast_ref::<f32>() {
      return Some(f64::from(*single));
    }
    integer_of(value).map(|wide| wide as f64)
  }

  fn zero() -> Option<Self> {
    Some(0.0)
  }
}

impl Param for f32 {
  fn from_value(value: &Value) -> Option<Self> {
    if let Some(exact) = value.downcast_ref::<f32>() {
      return Some(*exact);
    }
    if let Some(double) = value.downcast_ref::<f64>() {
      return Some(*double as f32);
    }
    integer_of(value).map(|wide| wide as f32)
  }

  fn zero() -> Option<Self> {
    Some(0.0)
  }
}

macro_rules! exact_param {
  ($($ty:ty),*) => {
    $(
      impl Param for $ty {
        fn from_value(value: &Value) -> Option<Self> {
          value.downcast_ref::<$ty>().cloned()
        }

        fn zero() -> Option<Self> {
          Some(<$ty>::default())
        }
      }
    )*
  };
}

exact_param!(bool, char, Duration);

impl Param for String {
  fn from_value(value: &Value) -> Option<Self> {
    value
      .downcast_ref::<String>()
      .cloned()
      .or_else(|| value.downcast_ref::<&'static str>().map(|text| text.to_string()))
  }

  fn zero() -> Option<Self> {
    Some(String::new())
  }
}

impl Param for PathBuf {
  fn from_value(value: &Value) -> Option<Self> {
    value
      .downcast_ref::<PathBuf>()
      .cloned()
      .or_else(|| String::from_value(value).map(PathBuf::from))
  }

  fn zero() -> Option<Self> {
    Some(PathBuf::new())
  }
}

impl<T: ?Sized + Send + Sync + 'static> Param for Arc<T> {
  fn from_value(value: &Value) -> Option<Self> {
    value.shared::<T>()
  }
}

impl<P: Param> Param for Option<P> {
  fn from_value(value: &Value) -> Option<Self> {
    P::from_value(value).map(Some)
  }

  fn zero() -> Option<Self> {
    Some(None)
  }
}

impl<P: Param + Clone> Param for Vec<P> {
  fn from_value(value: &Value) -> Option<Self> {
    if let Some(exact) = value.downcast_ref::<Vec<P>>() {
      return Some(exact.clone());
    }
    value
      .downcast_ref::<Vec<Value>>()?
      .iter()
      .map(P::from_value)
      .collect()
  }

  fn zero() -> Option<Self> {
    Some(Vec::new())
  }
}

impl Param for Value {
  fn from_value(value: &Value) -> Option<Self> {
    Some(value.clone())
  }
}
