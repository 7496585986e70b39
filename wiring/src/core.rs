//! Core, non-public data structures for the container.

use crate::error::{Error, Result};
use std::cell::RefCell;

thread_local! {
  // The (container, type id) pairs currently being built on this thread, in
  // resolution order. A repeated entry means the graph loops back on itself.
  static RESOLVING_STACK: RefCell<Vec<(usize, String)>> = RefCell::new(Vec::new());
}

/// An RAII guard to detect circular dependencies while building.
///
/// When created, it pushes the type id onto the thread-local resolution stack.
/// If the id is already on the stack for the same container, the build has
/// looped and `enter` fails with the cycle instead of recursing forever (or
/// blocking on the type's own once-cell). Dropping the guard pops the entry.
pub(crate) struct ResolutionGuard {
  _private: (),
}

impl ResolutionGuard {
  pub(crate) fn enter(container: usize, id: &str) -> Result<Self> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(start) = stack
        .iter()
        .position(|(serial, entry)| *serial == container && entry == id)
      {
        let mut cycle: Vec<String> = stack[start..]
          .iter()
          .filter(|(serial, _)| *serial == container)
          .map(|(_, entry)| entry.clone())
          .collect();
        cycle.push(id.to_string());
        return Err(Error::CircularDependency { cycle });
      }
      stack.push((container, id.to_string()));
      Ok(Self { _private: () })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().pop();
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reports_the_cycle_path() {
    let _a = ResolutionGuard::enter(1, "a").unwrap();
    let _b = ResolutionGuard::enter(1, "b").unwrap();
    let _other = ResolutionGuard::enter(2, "a").unwrap();
    match ResolutionGuard::enter(1, "a") {
      Err(Error::CircularDependency { cycle }) => assert_eq!(cycle, vec!["a", "b", "a"]),
      other => panic!("expected a circular dependency, got {:?}", other.map(|_| ())),
    }
  }

  #[test]
  fn dropping_the_guard_leaves_the_stack() {
    {
      let _guard = ResolutionGuard::enter(7, "x").unwrap();
    }
    assert!(ResolutionGuard::enter(7, "x").is_ok());
  }
}
