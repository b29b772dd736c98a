//! Typed jCard properties.
//!
//! Each property is a `[name, params, type, value, ...]` tuple (RFC 7095).
//! Values are decoded into a small tagged model up front so the dispatcher
//! never has to guess at runtime what a value holds.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A property value we know how to read
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Structured(Vec<Component>),
}

/// One component of a structured value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Component {
    Text(String),
    List(Vec<String>),
}

impl Component {
    /// Flatten to a single string; list members are joined with `", "`
    pub fn to_text(&self) -> String {
        match self {
            Component::Text(text) => text.clone(),
            Component::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::Structured(_) => None,
        }
    }
}

/// A decoded property tuple
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub params: Map<String, Value>,
    pub value_type: String,
    /// `None` when the value is present but of a shape we do not model
    pub value: Option<PropertyValue>,
}

impl Property {
    /// Decode one tuple. Returns `None` for tuples that are not well formed.
    ///
    /// Only the first value is kept for multi-valued properties.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let items = raw.as_array()?;
        if items.len() < 4 {
            return None;
        }

        let name = items[0].as_str()?.to_lowercase();
        let params = match &items[1] {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            _ => return None,
        };
        let value_type = items[2].as_str()?.to_string();
        let value = PropertyValue::deserialize(&items[3]).ok();

        Some(Self {
            name,
            params,
            value_type,
            value,
        })
    }

    /// A string parameter such as `label`
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.value.as_ref().and_then(PropertyValue::as_text)
    }
}
