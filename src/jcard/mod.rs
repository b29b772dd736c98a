//! jCard contact decoding (RFC 7095 / RFC 6350).
//!
//! A jCard is the JSON form of a vCard:
//!
//! ```json
//! ["vcard", [
//!   ["version", {}, "text", "4.0"],
//!   ["fn", {}, "text", "Joe Appleseed"],
//!   ["tel", {"type": ["work", "voice"]}, "uri", "tel:+1-555-555-1234;ext=555"]
//! ]]
//! ```
//!
//! Decoding is strict about the outer `["vcard", [...]]` frame and lenient
//! about individual properties: unknown or malformed ones are skipped.

pub mod address;
pub mod property;

pub use address::Address;
pub use property::{Component, Property, PropertyValue};

use crate::error::{RdapError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Tag in the first slot of every jCard
pub const JCARD_TAG: &str = "vcard";

/// Contact record decoded from a jCard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VCard {
    pub version: String,
    pub full_name: String,
    pub address: Address,
    pub kind: String,
    pub email: String,
    pub telephone: String,
    pub org: String,
}

impl VCard {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&mut self, property: &Property) {
        match property.name.as_str() {
            "version" => set_text(&mut self.version, property),
            "fn" => set_text(&mut self.full_name, property),
            "kind" => set_text(&mut self.kind, property),
            "email" => set_text(&mut self.email, property),
            "tel" => set_text(&mut self.telephone, property),
            "org" => match &property.value {
                Some(PropertyValue::Text(text)) => self.org = text.clone(),
                Some(PropertyValue::Structured(units)) => {
                    self.org = units
                        .iter()
                        .map(Component::to_text)
                        .filter(|unit| !unit.is_empty())
                        .collect::<Vec<_>>()
                        .join(", ");
                }
                None => skip(property),
            },
            "adr" => self.apply_address(property),
            _ => {}
        }
    }

    fn apply_address(&mut self, property: &Property) {
        let label = property.param_str("label").filter(|l| !l.trim().is_empty());

        let structured = match &property.value {
            Some(PropertyValue::Structured(components)) => Address::from_components(components),
            _ => None,
        };

        let mut address = match (structured, label) {
            (Some(address), _) => address,
            (None, Some(label)) => Address::from_label(label),
            (None, None) => {
                skip(property);
                return;
            }
        };

        if let Some(label) = label {
            address.label = label.to_string();
        }
        self.address = address;
    }
}

fn set_text(field: &mut String, property: &Property) {
    match property.text() {
        Some(text) => *field = text.to_string(),
        None => skip(property),
    }
}

fn skip(property: &Property) {
    tracing::debug!(
        property = %property.name,
        value_type = %property.value_type,
        "Skipping jCard property with unexpected value"
    );
}

/// Decode a jCard.
///
/// `null` and `[]` decode to an empty [`VCard`]. Anything else must be a
/// `["vcard", [properties...]]` array.
pub fn parse_jcard(data: &Value) -> Result<VCard> {
    let items = match data {
        Value::Null => return Ok(VCard::default()),
        Value::Array(items) if items.is_empty() => return Ok(VCard::default()),
        Value::Array(items) => items,
        _ => return Err(RdapError::parse("jCard must be an array", Some(data.to_string()))),
    };

    if items[0].as_str() != Some(JCARD_TAG) {
        return Err(RdapError::parse("not a vcard", Some(items[0].to_string())));
    }

    let properties = items
        .get(1)
        .and_then(Value::as_array)
        .ok_or_else(|| RdapError::parse("invalid jCard properties format", None))?;

    let mut vcard = VCard::default();
    for raw in properties {
        match Property::from_value(raw) {
            Some(property) => vcard.apply(&property),
            None => tracing::debug!(property = %raw, "Skipping malformed jCard property"),
        }
    }

    Ok(vcard)
}

/// Decode a jCard from JSON text
pub fn parse_jcard_str(text: &str) -> Result<VCard> {
    let value: Value = serde_json::from_str(text)?;
    parse_jcard(&value)
}

/// serde adapter for `vcardArray` fields
pub fn deserialize_vcard<'de, D>(deserializer: D) -> std::result::Result<Option<VCard>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    parse_jcard(&value)
        .map(Some)
        .map_err(serde::de::Error::custom)
}
