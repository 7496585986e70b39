//! Configuration parameters for `%name%` placeholders.
//!
//! A [`Config`] is built in code or loaded from a YAML or JSON document whose
//! top-level `parameters` mapping holds the values. Other top-level keys (for
//! example a `types` section consumed by a code generator) are ignored.
//!
//! ```yaml
//! parameters:
//!   database:
//!     host: localhost   # available as %database.host%
//!     port: 5432
//!   admins: [alice, bob]
//! ```

use crate::error::{Error, Result};
use crate::value::Value;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// A read-only map of parameter names to values.
#[derive(Debug, Clone, Default)]
pub struct Config {
  parameters: HashMap<String, Value>,
}

impl Config {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style [`Config::insert`].
  pub fn with<T: Send + Sync + 'static>(mut self, name: &str, value: T) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert<T: Send + Sync + 'static>(&mut self, name: &str, value: T) {
    self.parameters.insert(name.to_string(), Value::wrap(value));
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.parameters.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.parameters.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.parameters.len()
  }

  pub fn is_empty(&self) -> bool {
    self.parameters.is_empty()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.parameters.keys().map(String::as_str)
  }

  pub fn from_yaml_str(source: &str) -> Result<Self> {
    let raw: ConfigRaw = serde_yaml::from_str(source).map_err(|e| Error::ConfigParse(e.to_string()))?;
    Ok(process_raw_config(raw))
  }

  pub fn from_json_str(source: &str) -> Result<Self> {
    let raw: ConfigRaw = serde_json::from_str(source).map_err(|e| Error::ConfigParse(e.to_string()))?;
    Ok(process_raw_config(raw))
  }

  /// Loads a configuration file. Files ending in `.json` are parsed as JSON,
  /// everything else as YAML.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let mut source = String::new();
    io::BufReader::new(File::open(path)?).read_to_string(&mut source)?;

    let is_json = path
      .extension()
      .map_or(false, |extension| extension.eq_ignore_ascii_case("json"));
    let config = if is_json {
      Self::from_json_str(&source)?
    } else {
      Self::from_yaml_str(&source)?
    };
    debug!(path = %path.display(), parameters = config.len(), "loaded configuration");
    Ok(config)
  }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Config {
  fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
    Self {
      parameters: iter.into_iter().map(|(name, value)| (name.into(), value)).collect(),
    }
  }
}

#[derive(Debug, Deserialize)]
struct ConfigRaw {
  #[serde(default)]
  parameters: BTreeMap<String, RawParameter>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawParameter {
  Bool(bool),
  Int(i64),
  UInt(u64),
  Float(f64),
  Text(String),
  List(Vec<RawParameter>),
  Map(BTreeMap<String, RawParameter>),
  Null,
}

fn process_raw_config(raw: ConfigRaw) -> Config {
  let mut parameters = HashMap::new();
  for (name, parameter) in raw.parameters {
    flatten_into(&mut parameters, name, parameter);
  }
  Config { parameters }
}

// Nested mappings become dotted keys: `database: { host: x }` -> `database.host`.
fn flatten_into(parameters: &mut HashMap<String, Value>, name: String, parameter: RawParameter) {
  match parameter {
    RawParameter::Map(entries) => {
      for (key, nested) in entries {
        flatten_into(parameters, format!("{}.{}", name, key), nested);
      }
    }
    other => {
      if let Some(value) = other.into_value() {
        parameters.insert(name, value);
      }
    }
  }
}

impl RawParameter {
  fn into_value(self) -> Option<Value> {
    let value = match self {
      RawParameter::Bool(flag) => Value::new(flag),
      RawParameter::Int(number) => Value::new(number),
      RawParameter::UInt(number) => Value::new(number),
      RawParameter::Float(number) => Value::new(number),
      RawParameter::Text(text) => Value::new(text),
      RawParameter::List(items) => {
        Value::new(items.into_iter().filter_map(RawParameter::into_value).collect::<Vec<Value>>())
      }
      RawParameter::Map(entries) => Value::new(
        entries
          .into_iter()
          .filter_map(|(key, nested)| nested.into_value().map(|value| (key, value)))
          .collect::<HashMap<String, Value>>(),
      ),
      RawParameter::Null => return None,
    };
    Some(value)
  }
}
