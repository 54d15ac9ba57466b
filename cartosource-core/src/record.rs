//! Loosely typed configuration records handed over by the style layer.
//!
//! A [`ConfigRecord`] is a flat JSON object describing a single source. Every
//! accessor is total: it returns `Some` only when the key is present *and* the
//! value has the requested shape. Callers treat a mistyped key exactly like a
//! missing one.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors returned by [`ConfigRecord::from_json_str`].
#[derive(Debug, Error)]
pub enum RecordError {
    /// The text was not valid JSON.
    #[error("configuration record is not valid JSON")]
    Parse {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The JSON document was valid but not an object.
    #[error("configuration record must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type name of the top-level value.
        found: &'static str,
    },
}

/// A read-only mapping from option keys to dynamically typed values.
///
/// # Examples
/// ```
/// use cartosource_core::ConfigRecord;
/// use serde_json::json;
///
/// let record = ConfigRecord::from_value(json!({ "minzoom": 2, "scheme": "tms" }))
///     .expect("object literal");
/// assert_eq!(record.number("minzoom"), Some(2.0));
/// assert_eq!(record.string("scheme"), Some("tms"));
/// assert!(record.boolean("scheme").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigRecord {
    entries: Map<String, Value>,
}

impl From<Map<String, Value>> for ConfigRecord {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl ConfigRecord {
    /// Construct an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, returning `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(entries) => Some(Self { entries }),
            _ => None,
        }
    }

    /// Parse a record from JSON text.
    ///
    /// # Errors
    /// Returns [`RecordError::Parse`] for malformed JSON and
    /// [`RecordError::NotAnObject`] when the document is not an object.
    pub fn from_json_str(text: &str) -> Result<Self, RecordError> {
        let value: Value =
            serde_json::from_str(text).map_err(|source| RecordError::Parse { source })?;
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(RecordError::NotAnObject {
                found: type_name(&other),
            }),
        }
    }

    /// Insert or replace a value, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Whether the record holds `key`, regardless of its type.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value stored under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Any JSON number, widened to `f64`.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.typed(key, "number", Value::as_f64)
    }

    /// A JSON boolean.
    #[must_use]
    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.typed(key, "boolean", Value::as_bool)
    }

    /// A JSON string.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.typed(key, "string", Value::as_str)
    }

    /// A JSON object.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.typed(key, "object", Value::as_object)
    }

    /// An array whose elements are all strings.
    #[must_use]
    pub fn string_array(&self, key: &str) -> Option<Vec<String>> {
        self.typed(key, "array of strings", |value| {
            value
                .as_array()?
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect()
        })
    }

    /// An array whose elements are all numbers.
    #[must_use]
    pub fn number_array(&self, key: &str) -> Option<Vec<f64>> {
        self.typed(key, "array of numbers", numbers)
    }

    /// An array of exactly `N` numbers.
    ///
    /// # Examples
    /// ```
    /// use cartosource_core::ConfigRecord;
    ///
    /// let record = ConfigRecord::new().with("bounds", vec![-10.0, -5.0, 10.0, 5.0]);
    /// assert_eq!(record.fixed_numbers::<4>("bounds"), Some([-10.0, -5.0, 10.0, 5.0]));
    /// assert!(record.fixed_numbers::<3>("bounds").is_none());
    /// ```
    #[must_use]
    pub fn fixed_numbers<const N: usize>(&self, key: &str) -> Option<[f64; N]> {
        self.typed(key, "fixed-length array of numbers", fixed::<N>)
    }

    /// An array of exactly `N` coordinate pairs, each exactly two numbers.
    #[must_use]
    pub fn coordinate_pairs<const N: usize>(&self, key: &str) -> Option<[[f64; 2]; N]> {
        self.typed(key, "array of [longitude, latitude] pairs", |value| {
            let pairs = value
                .as_array()?
                .iter()
                .map(fixed::<2>)
                .collect::<Option<Vec<_>>>()?;
            pairs.try_into().ok()
        })
    }

    /// Look up `key` and coerce it, logging when a present value is mistyped.
    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: &'static str,
        coerce: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Option<T> {
        let value = self.entries.get(key)?;
        let coerced = coerce(value);
        if coerced.is_none() {
            log::debug!(
                "ignoring configuration key {key:?}: expected {expected}, found {}",
                type_name(value)
            );
        }
        coerced
    }
}

fn numbers(value: &Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(Value::as_f64).collect()
}

fn fixed<const N: usize>(value: &Value) -> Option<[f64; N]> {
    numbers(value)?.try_into().ok()
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
