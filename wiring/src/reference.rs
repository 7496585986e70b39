//! The placeholder syntax of factory arguments.
//!
//! | Syntax        | Meaning                                          |
//! |---------------|--------------------------------------------------|
//! | `%name%`      | the configuration parameter `name`               |
//! | `@id`         | the instance registered under `id`               |
//! | `@?id`        | same, but the zero value if `id` is undefined    |
//! | `@id::Method` | the exported `Method` of the instance at `id`    |

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static PARAMETER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^%(?P<name>[^%]+)%$").unwrap());

// The id is matched lazily so a method selector always binds to the last `::`.
static TYPE_REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^@(?P<optional>\?)?(?P<id>[^?:].*?)(?:::(?P<method>[^:]+))?$").unwrap()
});

pub fn is_parameter(text: &str) -> bool {
  PARAMETER_REGEX.is_match(text)
}

/// The name inside a `%name%` placeholder.
pub fn parameter_name(text: &str) -> Option<&str> {
  PARAMETER_REGEX
    .captures(text)
    .and_then(|captures| captures.name("name"))
    .map(|name| name.as_str())
}

pub fn is_type_reference(text: &str) -> bool {
  TYPE_REFERENCE_REGEX.is_match(text)
}

pub fn is_parameter_or_type_reference(text: &str) -> bool {
  is_parameter(text) || is_type_reference(text)
}

/// Formats the mandatory reference to `id`.
pub fn type_reference(id: &str) -> String {
  format!("@{}", id)
}

/// A parsed type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
  /// The reference exactly as written, e.g. `@?logger::Log`.
  pub raw: String,
  /// The referenced type id without modifiers.
  pub id: String,
  pub optional: bool,
  /// The method selector of a `@id::Method` reference.
  pub method: Option<String>,
}

impl TypeRef {
  pub fn parse(text: &str) -> Option<Self> {
    let captures = TYPE_REFERENCE_REGEX.captures(text)?;
    Some(Self {
      raw: text.to_string(),
      id: captures.name("id")?.as_str().to_string(),
      optional: captures.name("optional").is_some(),
      method: captures.name("method").map(|method| method.as_str().to_string()),
    })
  }

  pub fn is_func_reference(&self) -> bool {
    self.method.is_some()
  }
}

impl fmt::Display for TypeRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.raw)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn parameters() {
    assert!(is_parameter("%database.host%"));
    assert_eq!(parameter_name("%database.host%"), Some("database.host"));
    assert!(!is_parameter("%%"));
    assert!(!is_parameter("%half"));
    assert!(!is_parameter("100%"));
    assert!(!is_parameter("plain text"));
  }

  #[test]
  fn mandatory_reference() {
    let reference = TypeRef::parse("@logger").unwrap();
    assert_eq!(reference.id, "logger");
    assert!(!reference.optional);
    assert_eq!(reference.method, None);
    assert_eq!(reference.to_string(), "@logger");
  }

  #[test]
  fn optional_reference() {
    let reference = TypeRef::parse("@?cache.redis").unwrap();
    assert_eq!(reference.id, "cache.redis");
    assert!(reference.optional);
  }

  #[test]
  fn method_reference() {
    let reference = TypeRef::parse("@?provider::GetLogger").unwrap();
    assert_eq!(reference.id, "provider");
    assert!(reference.optional);
    assert_eq!(reference.method.as_deref(), Some("GetLogger"));
    assert!(reference.is_func_reference());

    let nested = TypeRef::parse("@app::http::handle").unwrap();
    assert_eq!(nested.id, "app::http");
    assert_eq!(nested.method.as_deref(), Some("handle"));
  }

  #[test]
  fn not_references() {
    assert_eq!(TypeRef::parse("@"), None);
    assert_eq!(TypeRef::parse("@?"), None);
    assert_eq!(TypeRef::parse("@::Method"), None);
    assert_eq!(TypeRef::parse("user@example.com"), None);
    assert!(!is_parameter_or_type_reference("Hello World"));
    assert!(is_parameter_or_type_reference("@foo"));
  }
}
