use fibre_wiring::{args, resolve, Config, Container, TypeRegistry};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger {
  prefix: String,
}

impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[{}]: {}", self.prefix, message);
  }
}

fn new_console_logger(prefix: String) -> ConsoleLogger {
  ConsoleLogger { prefix }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn new_report_service(logger: Arc<dyn Logger>) -> ReportService {
  ReportService { logger }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  // --- Registration ---
  let mut registry = TypeRegistry::new();
  registry.register_type("logger", new_console_logger, args!["%log.prefix%"]);
  registry.register_type("reports", new_report_service, args!["@logger"]);

  // A ConsoleLogger instance can be handed to anything that wants an Arc<dyn Logger>.
  registry.register_cast::<ConsoleLogger, dyn Logger>(|logger| logger);

  let container = Container::new(registry, Config::new().with("log.prefix", "CONSOLE LOG"));
  container.validate().expect("the type graph is valid");

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(container, Arc<ReportService>, "reports");

  println!("Using the service...");
  report_service.generate_report();

  // The logger is built once and shared.
  let logger = resolve!(container, Arc<dyn Logger>, "logger");
  logger.log("Same instance the report service uses.");
}
