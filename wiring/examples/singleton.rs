use fibre_wiring::{args, resolve, Config, Container, TypeRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

static CONNECTIONS: AtomicUsize = AtomicUsize::new(0);

struct DatabasePool {
  url: String,
  id: usize,
}

fn new_pool(url: String) -> DatabasePool {
  let id = CONNECTIONS.fetch_add(1, Ordering::SeqCst);
  println!("Opening pool #{} to {}", id, url);
  DatabasePool { url, id }
}

fn main() {
  let mut registry = TypeRegistry::new();
  registry.register_type("database", new_pool, args!["%database.url%"]);

  let config = Config::new().with("database.url", "postgres://localhost/app");
  let container = Arc::new(Container::new(registry, config));

  // Nothing is built until the first request, even when several threads ask at once.
  let handles: Vec<_> = (0..4)
    .map(|worker| {
      let container = Arc::clone(&container);
      thread::spawn(move || {
        let pool = resolve!(container, Arc<DatabasePool>, "database");
        println!("worker {} uses pool #{} ({})", worker, pool.id, pool.url);
        pool
      })
    })
    .collect();

  let pools: Vec<Arc<DatabasePool>> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
  assert!(pools.iter().all(|pool| Arc::ptr_eq(pool, &pools[0])));
  assert_eq!(CONNECTIONS.load(Ordering::SeqCst), 1);
  println!("All workers share the same pool.");
}
