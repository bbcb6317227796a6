// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

// serde_json::Value cannot carry binary blobs and does not keep the
// integer/double distinction the diagnostics need, hence a dedicated tree.
// BTree keys are fine: key order never affects validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(Arc<str>),
    Binary(Arc<[u8]>),
    Dict(Arc<BTreeMap<Arc<str>, DynamicValue>>),
    List(Arc<Vec<DynamicValue>>),
}

impl Serialize for DynamicValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DynamicValue::Null => serializer.serialize_none(),
            DynamicValue::Bool(b) => serializer.serialize_bool(*b),
            DynamicValue::Int(n) => serializer.serialize_i64(*n),
            DynamicValue::Double(d) => serializer.serialize_f64(*d),
            DynamicValue::String(s) => serializer.serialize_str(s.as_ref()),
            DynamicValue::Binary(b) => serializer.serialize_bytes(b.as_ref()),
            DynamicValue::Dict(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields.iter() {
                    map.serialize_entry(k.as_ref(), v)?;
                }
                map.end()
            }
            DynamicValue::List(items) => items.serialize(serializer),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = DynamicValue;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(DynamicValue::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(DynamicValue::Null)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(DynamicValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(DynamicValue::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        // Values above i64::MAX only fit the double tag.
        match i64::try_from(v) {
            Ok(n) => Ok(DynamicValue::Int(n)),
            Err(_) => Ok(DynamicValue::Double(v as f64)),
        }
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(DynamicValue::Double(v))
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(DynamicValue::String(s.into()))
    }

    fn visit_string<E>(self, s: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(DynamicValue::String(s.into()))
    }

    fn visit_bytes<E>(self, b: &[u8]) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(DynamicValue::Binary(b.into()))
    }

    fn visit_byte_buf<E>(self, b: Vec<u8>) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(DynamicValue::Binary(b.into()))
    }

    fn visit_seq<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let mut items: Vec<DynamicValue> = vec![];
        while let Some(v) = visitor.next_element()? {
            items.push(v);
        }
        Ok(DynamicValue::from(items))
    }

    fn visit_map<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut fields = BTreeMap::new();
        while let Some((key, value)) = visitor.next_entry::<Arc<str>, DynamicValue>()? {
            fields.insert(key, value);
        }
        Ok(DynamicValue::from(fields))
    }
}

impl<'de> Deserialize<'de> for DynamicValue {
    fn deserialize<D>(deserializer: D) -> Result<DynamicValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{s}"),
            Err(_e) => Err(std::fmt::Error),
        }
    }
}

impl DynamicValue {
    pub fn new_dict() -> DynamicValue {
        DynamicValue::from(BTreeMap::new())
    }

    pub fn new_list() -> DynamicValue {
        DynamicValue::from(Vec::<DynamicValue>::new())
    }

    /// Canonical tag name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            DynamicValue::Null => "null",
            DynamicValue::Bool(_) => "boolean",
            DynamicValue::Int(_) => "integer",
            DynamicValue::Double(_) => "double",
            DynamicValue::String(_) => "string",
            DynamicValue::Binary(_) => "binary",
            DynamicValue::Dict(_) => "dictionary",
            DynamicValue::List(_) => "list",
        }
    }

    pub fn from_json_str(json: &str) -> Result<DynamicValue> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_str(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_file(path: &str) -> Result<DynamicValue> {
        match std::fs::read_to_string(path) {
            Ok(c) => Self::from_json_str(c.as_str()),
            Err(e) => bail!("Failed to read {path}. {e}"),
        }
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<DynamicValue> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_file(path: &str) -> Result<DynamicValue> {
        match std::fs::read_to_string(path) {
            Ok(c) => Self::from_yaml_str(c.as_str()),
            Err(e) => bail!("Failed to read {path}. {e}"),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DynamicValue::Null)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            DynamicValue::Bool(b) => Ok(*b),
            _ => Err(anyhow!("not a bool")),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            DynamicValue::Int(n) => Ok(*n),
            _ => Err(anyhow!("not an integer")),
        }
    }

    pub fn as_double(&self) -> Result<f64> {
        match self {
            DynamicValue::Double(d) => Ok(*d),
            _ => Err(anyhow!("not a double")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            DynamicValue::String(s) => Ok(s.as_ref()),
            _ => Err(anyhow!("not a string")),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            DynamicValue::Binary(b) => Ok(b.as_ref()),
            _ => Err(anyhow!("not a binary blob")),
        }
    }

    pub fn as_dict(&self) -> Result<&BTreeMap<Arc<str>, DynamicValue>> {
        match self {
            DynamicValue::Dict(d) => Ok(d),
            _ => Err(anyhow!("not a dictionary")),
        }
    }

    pub fn as_list(&self) -> Result<&Vec<DynamicValue>> {
        match self {
            DynamicValue::List(items) => Ok(items),
            _ => Err(anyhow!("not a list")),
        }
    }
}

impl From<bool> for DynamicValue {
    fn from(b: bool) -> Self {
        DynamicValue::Bool(b)
    }
}

impl From<i64> for DynamicValue {
    fn from(n: i64) -> Self {
        DynamicValue::Int(n)
    }
}

impl From<i32> for DynamicValue {
    fn from(n: i32) -> Self {
        DynamicValue::Int(n.into())
    }
}

impl From<f64> for DynamicValue {
    fn from(d: f64) -> Self {
        DynamicValue::Double(d)
    }
}

impl From<&str> for DynamicValue {
    fn from(s: &str) -> Self {
        DynamicValue::String(s.into())
    }
}

impl From<String> for DynamicValue {
    fn from(s: String) -> Self {
        DynamicValue::String(s.into())
    }
}

impl From<Vec<u8>> for DynamicValue {
    fn from(b: Vec<u8>) -> Self {
        DynamicValue::Binary(b.into())
    }
}

impl From<Vec<DynamicValue>> for DynamicValue {
    fn from(items: Vec<DynamicValue>) -> Self {
        DynamicValue::List(Arc::new(items))
    }
}

impl From<BTreeMap<Arc<str>, DynamicValue>> for DynamicValue {
    fn from(fields: BTreeMap<Arc<str>, DynamicValue>) -> Self {
        DynamicValue::Dict(Arc::new(fields))
    }
}

impl From<serde_json::Value> for DynamicValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => DynamicValue::Null,
            serde_json::Value::Bool(b) => DynamicValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => DynamicValue::Int(i),
                None => DynamicValue::Double(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => DynamicValue::String(s.into()),
            serde_json::Value::Array(items) => {
                DynamicValue::from(items.into_iter().map(DynamicValue::from).collect::<Vec<_>>())
            }
            serde_json::Value::Object(fields) => DynamicValue::from(
                fields
                    .into_iter()
                    .map(|(k, v)| (Arc::<str>::from(k.as_str()), DynamicValue::from(v)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }
}
