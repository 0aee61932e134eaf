//! Attribute bag access
//!
//! The plugin host owns resource state; handlers only see it through
//! [`ResourceData`]. Getters return the zero value of the requested type for
//! unset or mistyped attributes, which is what the host hands out for unset
//! optional attributes anyway.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Typed attribute value.
///
/// Deserializes from any JSON/YAML value with the same rules as
/// [`AttrValue::from_json`]: floats become strings, nulls inside lists and
/// maps are dropped, and a bare null is rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<AttrValue>),
    Map(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, AttrValue>> {
        match self {
            AttrValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Convert an admin API JSON value. Nulls have no attribute form;
    /// non-integer numbers are kept as their string rendering.
    pub fn from_json(value: &Value) -> Option<AttrValue> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(AttrValue::Bool(*b)),
            Value::Number(n) => Some(
                n.as_i64()
                    .map(AttrValue::Int)
                    .unwrap_or_else(|| AttrValue::String(n.to_string())),
            ),
            Value::String(s) => Some(AttrValue::String(s.clone())),
            Value::Array(items) => Some(AttrValue::List(
                items.iter().filter_map(AttrValue::from_json).collect(),
            )),
            Value::Object(map) => Some(AttrValue::Map(
                map.iter()
                    .filter_map(|(k, v)| AttrValue::from_json(v).map(|v| (k.clone(), v)))
                    .collect(),
            )),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Int(i) => Value::from(*i),
            AttrValue::String(s) => Value::String(s.clone()),
            AttrValue::List(items) => Value::Array(items.iter().map(AttrValue::to_json).collect()),
            AttrValue::Map(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        AttrValue::from_json(&value).ok_or_else(|| D::Error::custom("null is not an attribute value"))
    }
}

/// Convert a JSON attribute map; null entries are treated as unset
pub fn attributes_from_json(values: BTreeMap<String, Value>) -> BTreeMap<String, AttrValue> {
    values
        .into_iter()
        .filter_map(|(key, value)| AttrValue::from_json(&value).map(|v| (key, v)))
        .collect()
}

fn deserialize_attributes<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, AttrValue>, D::Error> {
    BTreeMap::<String, Value>::deserialize(deserializer).map(attributes_from_json)
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::List(value.into_iter().map(AttrValue::String).collect())
    }
}

impl From<BTreeMap<String, AttrValue>> for AttrValue {
    fn from(value: BTreeMap<String, AttrValue>) -> Self {
        AttrValue::Map(value)
    }
}

/// Accessor over host-owned resource state
pub trait ResourceData {
    fn get(&self, key: &str) -> Option<&AttrValue>;

    fn set(&mut self, key: &str, value: AttrValue);

    /// Persisted identity; empty means the resource is absent
    fn id(&self) -> &str;

    fn set_id(&mut self, id: &str);

    fn get_str(&self, key: &str) -> String {
        self.get(key)
            .and_then(AttrValue::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn get_int(&self, key: &str) -> i64 {
        self.get(key).and_then(AttrValue::as_int).unwrap_or_default()
    }

    fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(AttrValue::as_bool).unwrap_or_default()
    }

    /// String elements of a list attribute
    fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(AttrValue::as_list)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_map(&self, key: &str) -> BTreeMap<String, AttrValue> {
        self.get(key)
            .and_then(AttrValue::as_map)
            .cloned()
            .unwrap_or_default()
    }
}

/// In-memory attribute bag, used by the driver binary and in tests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeBag {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_attributes")]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attributes(attributes: BTreeMap<String, AttrValue>) -> Self {
        Self {
            id: String::new(),
            attributes,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}

impl ResourceData for AttributeBag {
    fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    fn set(&mut self, key: &str, value: AttrValue) {
        self.attributes.insert(key.to_string(), value);
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }
}
