//! Public macros for declaring factories and resolving instances.

/// Builds a `Vec<Arg>` of raw factory arguments.
///
/// Strings become text arguments (which may be placeholders such as
/// `"%name%"`, `"@id"`, `"@?id"` or `"@id::Method"`); everything else becomes a
/// typed literal.
///
/// ```
/// use fibre_wiring::{args, Arg};
///
/// let args = args!["@logger", "%http.port%", 3_u8];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[0], Arg::from("@logger"));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Arg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),+]
    };
}

/// Declares a struct that can be registered as a struct factory.
///
/// The struct derives `Default`; a struct factory starts from the default value
/// and assigns its resolved arguments to the fields in declaration order. Every
/// field type must implement `Param` and `Default` (use `Option<Arc<T>>` for
/// references to other instances).
///
/// ```
/// use fibre_wiring::{args, assemble, Config, Container, TypeRegistry};
///
/// assemble! {
///     pub struct Endpoint {
///         pub host: String,
///         pub port: u16,
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register_type("endpoint", Endpoint::default(), args!["localhost", "%port%"]);
///
/// let container = Container::new(registry, Config::new().with("port", 8080_i64));
/// let endpoint = container.get("endpoint").unwrap();
/// let endpoint = endpoint.downcast_ref::<Endpoint>().unwrap();
/// assert_eq!(endpoint.host, "localhost");
/// assert_eq!(endpoint.port, 8080);
/// ```
#[macro_export]
macro_rules! assemble {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Assemble for $name {
            fn fields() -> ::std::vec::Vec<$crate::FieldSpec> {
                ::std::vec![
                    $($crate::FieldSpec::new(::std::stringify!($field), $crate::TypeSpec::of::<$ty>())),*
                ]
            }

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn assign(&mut self, index: usize, value: $crate::Bound) -> $crate::Result<()> {
                let mut position = 0_usize;
                $(
                    if index == position {
                        self.$field = $crate::unbox::<$ty>(
                            value,
                            ::std::concat!(::std::stringify!($name), ".", ::std::stringify!($field)),
                        )?;
                        return ::std::result::Result::Ok(());
                    }
                    position += 1;
                )*
                ::std::result::Result::Err($crate::Error::Arity {
                    target: ::std::stringify!($name).to_string(),
                    expected: position.to_string(),
                    actual: index + 1,
                })
            }
        }
    };
}

/// Implements `Param` for types that are passed around by clone.
///
/// `impl_param!(Settings)` accepts a `Settings` instance wherever a `Settings`
/// parameter is expected. Prefix the list with `default:` to also use
/// `Default::default()` as the zero value of undefined optional references.
#[macro_export]
macro_rules! impl_param {
    (default: $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Param for $ty {
                fn from_value(value: &$crate::Value) -> ::std::option::Option<Self> {
                    value.downcast_ref::<$ty>().cloned()
                }

                fn zero() -> ::std::option::Option<Self> {
                    ::std::option::Option::Some(<$ty as ::std::default::Default>::default())
                }
            }
        )+
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Param for $ty {
                fn from_value(value: &$crate::Value) -> ::std::option::Option<Self> {
                    value.downcast_ref::<$ty>().cloned()
                }
            }
        )+
    };
}

/// Resolves an instance from a container, panicking if it cannot be built.
///
/// # Panics
///
/// Panics if the type is not registered, cannot be generated, or (in the typed
/// form) is not assignable to the requested type. For a non-panicking version,
/// use `Container::get` / `Container::get_as`.
///
/// # Examples
///
/// ```
/// use fibre_wiring::{args, resolve, Container};
/// use std::sync::Arc;
///
/// fn greeting() -> String {
///     "hello".to_string()
/// }
///
/// let mut container = Container::default();
/// container.registry_mut().register_type("greeting", greeting, args![]);
///
/// let shared = resolve!(container, Arc<String>, "greeting");
/// assert_eq!(*shared, "hello");
///
/// let value = resolve!(container, "greeting");
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "hello");
/// ```
#[macro_export]
macro_rules! resolve {
    // Typed form: resolve!(container, Arc<dyn Logger>, "logger")
    ($container:expr, $type:ty, $id:expr) => {
        $container.get_as::<$type>($id).unwrap_or_else(|error| {
            panic!(
                "Failed to resolve required type \"{}\" as {}: {}",
                $id,
                ::std::any::type_name::<$type>(),
                error
            )
        })
    };

    // Untyped form: resolve!(container, "logger")
    ($container:expr, $id:expr) => {
        $container
            .get($id)
            .unwrap_or_else(|error| panic!("Failed to resolve required type \"{}\": {}", $id, error))
    };
}
