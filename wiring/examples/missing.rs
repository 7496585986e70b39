use fibre_wiring::{args, resolve, Config, Container, Error, TypeRegistry};
use std::panic;

fn new_report(_database: String) -> String {
  "report".to_string()
}

fn main() {
  let mut registry = TypeRegistry::new();
  registry.register_type("report", new_report, args!["@database"]);
  let container = Container::new(registry, Config::new());

  // --- Static validation, before anything is built ---
  match container.validate() {
    Err(Error::UndefinedReference { type_id, referenced }) => {
      println!("Validation caught it: \"{}\" needs \"{}\".", type_id, referenced)
    }
    other => panic!("expected an undefined reference, got {:?}", other),
  }

  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a type whose dependency was never registered...");
  let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    // This line will panic!
    let _report = resolve!(container, "report");
  }));
  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible `get()` method ---
  match container.get("report") {
    Ok(_) => panic!("Should not have built the report!"),
    Err(error) => println!("Correctly received an error: {}", error.root_cause()),
  }
}
