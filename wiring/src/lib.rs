//! # Fibre Wiring
//!
//! A lazy, thread-safe object-graph container for Rust.
//!
//! Types are registered under string ids together with a factory descriptor
//! and a list of raw arguments. Arguments are resolved only when a type is
//! first requested: `%name%` reads a configuration parameter, `@id` builds (or
//! reuses) another registered type, `@?id` does the same but falls back to a
//! zero value when `id` is not registered, and `@id::Method` passes an exported
//! method of another instance as a function. Every type is built once and
//! cached for the lifetime of the container.
//!
//! ## Core Concepts
//!
//! - **TypeRegistry**: ids bound to [`Factory`] descriptors, plus the method
//!   and cast tables used by proxies, function references and trait objects.
//! - **Container**: builds and caches instances on demand.
//! - **ParameterResolver**: turns raw arguments into typed values.
//! - **Validation**: checks the registry for undefined references and cycles
//!   before anything is built.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_wiring::{args, Config, Container, TypeRegistry};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct PrefixLogger {
//!     prefix: String,
//! }
//!
//! impl Logger for PrefixLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("{} {}", self.prefix, message)
//!     }
//! }
//!
//! struct Mailer {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! fn new_logger(prefix: String) -> PrefixLogger {
//!     PrefixLogger { prefix }
//! }
//!
//! fn new_mailer(logger: Arc<dyn Logger>) -> Mailer {
//!     Mailer { logger }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_type("logger", new_logger, args!["%log.prefix%"]);
//! registry.register_type("mailer", new_mailer, args!["@logger"]);
//! registry.register_cast::<PrefixLogger, dyn Logger>(|logger| logger);
//!
//! let container = Container::new(registry, Config::new().with("log.prefix", "[mail]"));
//! container.validate().unwrap();
//!
//! let mailer = container.get_as::<Arc<Mailer>>("mailer").unwrap();
//! assert_eq!(mailer.logger.log("sent"), "[mail] sent");
//!
//! // Every request returns the same instance.
//! let again = container.get_as::<Arc<Mailer>>("mailer").unwrap();
//! assert!(Arc::ptr_eq(&mailer, &again));
//! ```

mod argument;
mod callable;
mod cast;
mod config;
mod container;
mod core;
mod error;
pub mod factory;
mod macros;
mod methods;
pub mod reference;
mod registry;
mod resolver;
pub mod validation;
mod value;

pub use argument::Arg;
pub use callable::{is_exported, Constructor, IntoMethod, Method, Signature};
pub use cast::Casts;
pub use config::Config;
pub use container::{Container, ParameterPolicy};
pub use error::{Error, Result};
pub use factory::{
  Assemble, Factory, FieldSpec, FuncReferenceFactory, FunctionFactory, InstanceFactory, IntoFactory,
  ProxyFactory, StructFactory,
};
pub use methods::MethodTable;
pub use reference::TypeRef;
pub use registry::TypeRegistry;
pub use resolver::ParameterResolver;
pub use validation::{validate, Validator};
pub use value::{Bound, Param, TypeSpec, Value, Variadic};

#[doc(hidden)]
pub use value::unbox;
