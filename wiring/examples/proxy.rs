use fibre_wiring::{args, resolve, Config, Container, Factory, TypeRegistry};
use std::sync::Arc;

struct Logger {
  name: String,
}

impl Logger {
  fn log(&self, message: &str) {
    println!("[{}] {}", self.name, message);
  }
}

struct LoggerProvider {
  application: String,
}

impl LoggerProvider {
  fn get_logger(&self, name: String) -> Logger {
    Logger {
      name: format!("{}.{}", self.application, name),
    }
  }
}

fn new_provider(application: String) -> LoggerProvider {
  LoggerProvider { application }
}

fn main() {
  let mut registry = TypeRegistry::new();
  registry.register_type("logger_provider", new_provider, args!["%app.name%"]);
  registry.register_method("GetLogger", LoggerProvider::get_logger);

  // "mail_logger" is whatever `@logger_provider::GetLogger("mail")` returns.
  registry.register("mail_logger", Factory::proxy("logger_provider", "GetLogger", args!["mail"]));

  // "logger_factory" is the method itself, bound to the provider instance.
  registry.register("logger_factory", Factory::func_reference("logger_provider", "GetLogger"));

  let container = Container::new(registry, Config::new().with("app.name", "shop"));

  let mail_logger = resolve!(container, Arc<Logger>, "mail_logger");
  mail_logger.log("Order confirmation sent.");

  let logger_factory = resolve!(container, Arc<dyn Fn(String) -> Logger + Send + Sync>, "logger_factory");
  logger_factory("billing".to_string()).log("Invoice created.");
}
