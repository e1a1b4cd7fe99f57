//! Domain Value Objects
//!
//! Immutable value types for the config store.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Maximum key length
const KEY_MAX_LENGTH: usize = 100;

/// Configuration key
///
/// Trimmed, non-empty, ASCII letters/digits plus `_`, `.` and `-`.
/// Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigKey(String);

impl ConfigKey {
    pub fn new(key: impl AsRef<str>) -> ConfigResult<Self> {
        let key = key.as_ref().trim();

        if key.is_empty() {
            return Err(ConfigError::InvalidKey("key cannot be empty".to_string()));
        }

        if key.len() > KEY_MAX_LENGTH {
            return Err(ConfigError::InvalidKey(format!(
                "key must be at most {} characters",
                KEY_MAX_LENGTH
            )));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(ConfigError::InvalidKey(format!(
                "'{}' contains unsupported characters",
                key
            )));
        }

        Ok(Self(key.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ConfigKey {
    type Error = ConfigError;

    fn try_from(value: String) -> ConfigResult<Self> {
        Self::new(value)
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration value
///
/// A tagged union over the JSON shapes a setting may take. Serialized
/// as plain JSON, so the wire and database form is the bare value. `null`
/// is not a value at any depth; deactivate the entry instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum ConfigValue {
    Bool(bool),
    Number(Number),
    Text(String),
    List(Vec<ConfigValue>),
    Object(Map<String, Value>),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Finite floats only
    pub fn from_f64(value: f64) -> Option<Self> {
        Number::from_f64(value).map(ConfigValue::Number)
    }

    /// Shape name, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::Text(_) => "string",
            ConfigValue::List(_) => "array",
            ConfigValue::Object(_) => "object",
        }
    }

    pub fn into_json(self) -> Value {
        Value::from(self)
    }
}

impl TryFrom<Value> for ConfigValue {
    type Error = ConfigError;

    fn try_from(value: Value) -> ConfigResult<Self> {
        match value {
            Value::Null => Err(ConfigError::InvalidValue(
                "null is not a configuration value".to_string(),
            )),
            Value::Bool(b) => Ok(ConfigValue::Bool(b)),
            Value::Number(n) => Ok(ConfigValue::Number(n)),
            Value::String(s) => Ok(ConfigValue::Text(s)),
            Value::Array(items) => items
                .into_iter()
                .map(ConfigValue::try_from)
                .collect::<ConfigResult<Vec<_>>>()
                .map(ConfigValue::List),
            Value::Object(map) if map.values().any(contains_null) => Err(
                ConfigError::InvalidValue("null is not allowed inside an object".to_string()),
            ),
            Value::Object(map) => Ok(ConfigValue::Object(map)),
        }
    }
}

fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}

impl From<ConfigValue> for Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Bool(b) => Value::Bool(b),
            ConfigValue::Number(n) => Value::Number(n),
            ConfigValue::Text(s) => Value::String(s),
            ConfigValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            ConfigValue::Object(map) => Value::Object(map),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        ConfigValue::Number(value.into())
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_valid() {
        assert!(ConfigKey::new("2fa_enabled_for_login").is_ok());
        assert!(ConfigKey::new("site.name").is_ok());
        assert_eq!(ConfigKey::new("  maintenance_mode ").unwrap().as_str(), "maintenance_mode");
    }

    #[test]
    fn test_key_invalid() {
        assert!(ConfigKey::new("").is_err());
        assert!(ConfigKey::new("   ").is_err());
        assert!(ConfigKey::new("has space").is_err());
        assert!(ConfigKey::new("a".repeat(KEY_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_value_deserializes_plain_json() {
        let v: ConfigValue = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(v, ConfigValue::Bool(true));

        let v: ConfigValue = serde_json::from_value(json!(25)).unwrap();
        assert_eq!(v.as_i64(), Some(25));

        let v: ConfigValue = serde_json::from_value(json!("LinkMarket")).unwrap();
        assert_eq!(v.as_str(), Some("LinkMarket"));

        let v: ConfigValue = serde_json::from_value(json!({"min": 1, "max": 5})).unwrap();
        assert_eq!(v.type_name(), "object");

        let v: ConfigValue = serde_json::from_value(json!(["a", 1])).unwrap();
        assert_eq!(v.type_name(), "array");
    }

    #[test]
    fn test_value_rejects_null() {
        assert!(serde_json::from_value::<ConfigValue>(json!(null)).is_err());
        assert!(ConfigValue::try_from(json!(null)).is_err());
        assert!(ConfigValue::try_from(json!([1, null])).is_err());
        assert!(ConfigValue::try_from(json!({"a": null})).is_err());
        assert!(ConfigValue::try_from(json!({"a": [{"b": null}]})).is_err());
        assert!(serde_json::from_value::<ConfigValue>(json!({"a": null})).is_err());

        let nested = ConfigValue::try_from(json!({"a": [1, {"b": "c"}]})).unwrap();
        assert_eq!(nested.type_name(), "object");
    }

    #[test]
    fn test_value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&ConfigValue::from(false)).unwrap(), "false");
        assert_eq!(serde_json::to_string(&ConfigValue::from("x")).unwrap(), r#""x""#);
        assert_eq!(ConfigValue::from(3_i64).into_json(), json!(3));
    }

    #[test]
    fn test_value_non_finite_float() {
        assert!(ConfigValue::from_f64(f64::NAN).is_none());
        assert_eq!(ConfigValue::from_f64(1.5).and_then(|v| v.as_f64()), Some(1.5));
    }
}
