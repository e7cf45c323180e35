//! Opaque dataset records.
//!
//! Abilities and species from every franchise share one representation: a JSON
//! object whose identifying field varies by dataset (`name` for abilities, `nr`
//! for Nexomon, `number` for Fakemon, ...). The core never interprets items beyond
//! reading the id, name, and whatever fields the active filters and sort touch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record of a dataset.
///
/// Serializes transparently as the underlying JSON object.
///
/// # Examples
///
/// ```
/// use dexquery::Item;
/// use serde_json::json;
///
/// let item = Item::from_value(json!({ "nr": 7, "name": "Drakling" })).unwrap();
/// assert_eq!(item.id("nr").as_deref(), Some("7"));
/// assert_eq!(item.text("name"), Some("Drakling"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    /// Wraps a JSON object. Returns `None` for any other JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Returns the raw value of `field`, if present.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns `field` as a string slice when it holds a JSON string.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Returns the identifier stored under `id_field`, rendered as a string.
    ///
    /// Numeric and string identifiers compare equal when they render the same,
    /// so `7` and `"7"` identify the same item. `null` counts as absent.
    #[must_use]
    pub fn id(&self, id_field: &str) -> Option<String> {
        self.0.get(id_field).and_then(render_key)
    }
}

impl From<Map<String, Value>> for Item {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Renders a scalar JSON value the way identifiers and filter values are compared.
pub(crate) fn render_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
