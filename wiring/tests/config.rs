use fibre_wiring::{args, Config, Container, Error, TypeRegistry};
use std::io::Write;
use std::sync::Arc;

// --- Config Fixtures ---

struct Database {
  host: String,
  port: u16,
  replicas: Vec<String>,
}

fn new_database(host: String, port: u16, replicas: Vec<String>) -> Database {
  Database { host, port, replicas }
}

fn database_registry() -> TypeRegistry {
  let mut registry = TypeRegistry::new();
  registry.register_type(
    "database",
    new_database,
    args!["%database.host%", "%database.port%", "%database.replicas%"],
  );
  registry
}

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
  let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
  file.write_all(contents.as_bytes()).unwrap();
  file.flush().unwrap();
  file
}

// --- Config Tests ---

#[test]
fn test_yaml_file_feeds_parameters() {
  // Arrange
  let file = write_config(
    ".yml",
    r#"
parameters:
  database:
    host: db.internal
    port: 5432
    replicas:
      - replica-1
      - replica-2
types:
  database:
    package: ignored
"#,
  );

  // Act
  let config = Config::from_file(file.path()).unwrap();
  let container = Container::new(database_registry(), config);
  let database = container.get_as::<Arc<Database>>("database").unwrap();

  // Assert
  assert_eq!(database.host, "db.internal");
  assert_eq!(database.port, 5432);
  assert_eq!(database.replicas, vec!["replica-1", "replica-2"]);
}

#[test]
fn test_json_file_feeds_parameters() {
  let file = write_config(
    ".json",
    r#"{"parameters": {"database": {"host": "json.internal", "port": 6543, "replicas": []}}}"#,
  );

  let config = Config::from_file(file.path()).unwrap();
  let container = Container::new(database_registry(), config);
  let database = container.get_as::<Arc<Database>>("database").unwrap();

  assert_eq!(database.host, "json.internal");
  assert_eq!(database.port, 6543);
  assert!(database.replicas.is_empty());
}

#[test]
fn test_out_of_range_number_is_a_type_mismatch() {
  let config = Config::from_yaml_str(
    "parameters:\n  database:\n    host: h\n    port: 70000\n    replicas: []\n",
  )
  .unwrap();
  let container = Container::new(database_registry(), config);

  let error = container.get("database").unwrap_err();
  assert!(matches!(error.root_cause(), Error::TypeMismatch { .. }), "{}", error);
}

#[test]
fn test_missing_file_is_a_read_error() {
  let directory = tempfile::tempdir().unwrap();
  let error = Config::from_file(directory.path().join("absent.yml")).unwrap_err();
  assert!(matches!(error, Error::ConfigRead(_)));
}

#[test]
fn test_malformed_yaml_is_a_parse_error() {
  let file = write_config(".yaml", "parameters: [unclosed\n");
  let error = Config::from_file(file.path()).unwrap_err();
  assert!(matches!(error, Error::ConfigParse(_)));
}
