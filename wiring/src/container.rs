//! The main `Container` struct and its associated methods.

use crate::config::Config;
use crate::core::ResolutionGuard;
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::resolver::ParameterResolver;
use crate::validation;
use crate::value::{unbox, Param, TypeSpec, Value};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

static NEXT_SERIAL: AtomicUsize = AtomicUsize::new(1);

/// What to do with a `%name%` placeholder whose parameter is not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterPolicy {
  /// Use the placeholder text itself as a string literal.
  #[default]
  Passthrough,
  /// Fail with [`Error::UndefinedParameter`].
  Strict,
}

/// The object-graph container.
///
/// Each registered type is built at most once, on first request, and the
/// instance is cached for the lifetime of the container. `Container` is
/// `Send + Sync`; concurrent requests for a type that is still being built wait
/// for that build instead of starting another one.
pub struct Container {
  registry: TypeRegistry,
  config: Config,
  cache: DashMap<String, Arc<OnceCell<Value>>>,
  parameter_policy: ParameterPolicy,
  serial: usize,
}

impl Container {
  pub fn new(registry: TypeRegistry, config: Config) -> Self {
    Self {
      registry,
      config,
      cache: DashMap::new(),
      parameter_policy: ParameterPolicy::default(),
      serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
    }
  }

  pub fn with_parameter_policy(mut self, policy: ParameterPolicy) -> Self {
    self.parameter_policy = policy;
    self
  }

  pub fn registry(&self) -> &TypeRegistry {
    &self.registry
  }

  /// Mutable access to the registry. Instances that are already cached are not
  /// affected by later registrations.
  pub fn registry_mut(&mut self) -> &mut TypeRegistry {
    &mut self.registry
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn parameter_policy(&self) -> ParameterPolicy {
    self.parameter_policy
  }

  pub fn resolver(&self) -> ParameterResolver<'_> {
    ParameterResolver::new(self)
  }

  // --- Resolution ---

  /// Returns the instance registered as `id`, building it on first request.
  pub fn get(&self, id: &str) -> Result<Value> {
    self
      .lookup(id)?
      .ok_or_else(|| Error::UnknownTypeReference { id: id.to_string() })
  }

  /// Like [`Container::get`], but panics on failure. Meant for startup wiring.
  pub fn must_get(&self, id: &str) -> Value {
    self.get(id).unwrap_or_else(|error| panic!("{}", error))
  }

  /// Returns the instance registered as `id` as a `T`, applying registered
  /// casts. `Container::get_as::<Arc<dyn Logger>>("logger")` is the usual form.
  pub fn get_as<T: Param>(&self, id: &str) -> Result<T> {
    let value = self.get(id)?;
    let expected = TypeSpec::of::<T>();
    let bound = self
      .registry
      .casts()
      .bind(&value, &expected)
      .ok_or_else(|| Error::TypeMismatch {
        subject: format!("the type \"{}\"", id),
        actual: value.type_name().to_string(),
        expected: expected.name().to_string(),
      })?;
    unbox::<T>(bound, id)
  }

  pub fn must_get_as<T: Param>(&self, id: &str) -> T {
    self.get_as(id).unwrap_or_else(|error| panic!("{}", error))
  }

  /// `Ok(None)` if `id` is not registered; otherwise the (possibly new) instance.
  pub fn lookup(&self, id: &str) -> Result<Option<Value>> {
    if let Some(value) = self.cached(id) {
      trace!(type_id = id, "cache hit");
      return Ok(Some(value));
    }
    let Some(factory) = self.registry.get(id) else {
      return Ok(None);
    };

    // Take the cell out of the map before building, so the shard lock is not
    // held while other types are resolved.
    let cell = self.cache.entry(id.to_string()).or_default().value().clone();
    if let Some(value) = cell.get() {
      return Ok(Some(value.clone()));
    }

    let _guard = ResolutionGuard::enter(self.serial, id)?;
    let value = cell.get_or_try_init(|| {
      debug!(type_id = id, kind = factory.kind(), "generating type");
      let value = factory
        .generate(&self.resolver())
        .map_err(|source| Error::Generation {
          id: id.to_string(),
          source: Box::new(source),
        })?;
      debug!(type_id = id, instance = value.type_name(), "cached instance");
      Ok::<_, Error>(value)
    })?;
    Ok(Some(value.clone()))
  }

  fn cached(&self, id: &str) -> Option<Value> {
    self.cache.get(id).and_then(|cell| cell.get().cloned())
  }

  // --- Bulk access ---

  /// Builds every registered type, in id order, and stops at the first failure.
  pub fn warmup_cache(&self) -> Result<()> {
    let ids = self.registry.collect_type_ids();
    for id in &ids {
      self.get(id).map_err(|source| Error::Warmup {
        id: id.clone(),
        source: Box::new(source),
      })?;
    }
    debug!(types = ids.len(), "warmed up cache");
    Ok(())
  }

  /// Builds and returns every registered type.
  pub fn get_all_instances(&self) -> Result<HashMap<String, Value>> {
    self
      .registry
      .collect_type_ids()
      .into_iter()
      .map(|id| self.get(&id).map(|value| (id, value)))
      .collect()
  }

  /// Returns the requested types that can be built; failures are skipped.
  pub fn get_multiple<I, S>(&self, ids: I) -> HashMap<String, Value>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    ids
      .into_iter()
      .filter_map(|id| {
        let id = id.as_ref();
        self.get(id).ok().map(|value| (id.to_string(), value))
      })
      .collect()
  }

  // --- Introspection ---

  /// Ids of the types that have been built so far, sorted.
  pub fn cached_type_ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self
      .cache
      .iter()
      .filter(|entry| entry.value().get().is_some())
      .map(|entry| entry.key().clone())
      .collect();
    ids.sort_unstable();
    ids
  }

  /// The instances built so far, as `(id, instance)` pairs in no particular order.
  ///
  /// Iterates over a snapshot, so the container can be used while iterating.
  pub fn instances(&self) -> impl Iterator<Item = (String, Value)> {
    self.snapshot().into_iter()
  }

  pub fn collect_cached_instances(&self) -> HashMap<String, Value> {
    self.snapshot().into_iter().collect()
  }

  // Shard locks are released before the snapshot is returned.
  fn snapshot(&self) -> Vec<(String, Value)> {
    self
      .cache
      .iter()
      .filter_map(|entry| entry.value().get().map(|value| (entry.key().clone(), value.clone())))
      .collect()
  }

  /// Statically checks the registry for undefined references and cycles.
  pub fn validate(&self) -> Result<()> {
    validation::validate(&self.registry)
  }
}

impl Default for Container {
  fn default() -> Self {
    Self::new(TypeRegistry::new(), Config::new())
  }
}

impl std::fmt::Debug for Container {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Container")
      .field("types", &self.registry.len())
      .field("cached", &self.cached_type_ids())
      .field("parameter_policy", &self.parameter_policy)
      .finish()
  }
}
