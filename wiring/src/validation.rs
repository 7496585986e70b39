//! Static checks of a registry, without building anything.
//!
//! The default [`Validator`] runs two constraints in order: every type
//! reference must name a registered type, and the reference graph must be
//! acyclic. Optional references (`@?id`) to unregistered types are allowed and
//! end the walk.

use crate::error::{Error, Result};
use crate::factory::Factory;
use crate::reference::TypeRef;
use crate::registry::TypeRegistry;
use std::collections::HashSet;
use tracing::debug;

/// A single check over a registry.
pub trait Constraint: Send + Sync {
  fn name(&self) -> &'static str;

  fn validate(&self, registry: &TypeRegistry) -> Result<()>;
}

fn references(factory: &Factory) -> impl Iterator<Item = TypeRef> {
  factory
    .arguments()
    .into_iter()
    .filter_map(|arg| arg.type_reference())
}

/// Fails with [`Error::UndefinedReference`] if a factory references a type id
/// that is not registered.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeReferencesConstraint;

impl Constraint for TypeReferencesConstraint {
  fn name(&self) -> &'static str {
    "type_references"
  }

  fn validate(&self, registry: &TypeRegistry) -> Result<()> {
    for type_id in registry.collect_type_ids() {
      let Some(factory) = registry.get(&type_id) else {
        continue;
      };
      for type_ref in references(factory) {
        if !type_ref.optional && !registry.contains(&type_ref.id) {
          return Err(Error::UndefinedReference {
            type_id,
            referenced: type_ref.id,
          });
        }
      }
    }
    Ok(())
  }
}

/// Fails with [`Error::CircularDependency`] if following type references from
/// any type leads back to a type already on the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct CircularDependencyConstraint;

impl CircularDependencyConstraint {
  fn visit(
    &self,
    registry: &TypeRegistry,
    id: &str,
    path: &mut Vec<String>,
    finished: &mut HashSet<String>,
  ) -> Result<()> {
    if finished.contains(id) {
      return Ok(());
    }
    if let Some(start) = path.iter().position(|entry| entry == id) {
      let mut cycle = path[start..].to_vec();
      cycle.push(id.to_string());
      return Err(Error::CircularDependency { cycle });
    }
    // Undefined types are reported by `TypeReferencesConstraint`.
    let Some(factory) = registry.get(id) else {
      return Ok(());
    };

    path.push(id.to_string());
    for type_ref in references(factory) {
      self.visit(registry, &type_ref.id, path, finished)?;
    }
    path.pop();
    finished.insert(id.to_string());
    Ok(())
  }
}

impl Constraint for CircularDependencyConstraint {
  fn name(&self) -> &'static str {
    "circular_dependency"
  }

  fn validate(&self, registry: &TypeRegistry) -> Result<()> {
    let mut finished = HashSet::new();
    let mut path = Vec::new();
    for type_id in registry.collect_type_ids() {
      self.visit(registry, &type_id, &mut path, &mut finished)?;
    }
    Ok(())
  }
}

/// Runs a list of constraints in order and stops at the first failure.
pub struct Validator {
  constraints: Vec<Box<dyn Constraint>>,
}

impl Validator {
  /// A validator without constraints.
  pub fn new() -> Self {
    Self {
      constraints: Vec::new(),
    }
  }

  pub fn with_constraint(mut self, constraint: impl Constraint + 'static) -> Self {
    self.constraints.push(Box::new(constraint));
    self
  }

  pub fn validate(&self, registry: &TypeRegistry) -> Result<()> {
    for constraint in &self.constraints {
      constraint.validate(registry)?;
      debug!(constraint = constraint.name(), types = registry.len(), "validation passed");
    }
    Ok(())
  }
}

impl Default for Validator {
  fn default() -> Self {
    Self::new()
      .with_constraint(TypeReferencesConstraint)
      .with_constraint(CircularDependencyConstraint)
  }
}

/// Validates `registry` with the default constraints.
pub fn validate(registry: &TypeRegistry) -> Result<()> {
  Validator::default().validate(registry)
}
