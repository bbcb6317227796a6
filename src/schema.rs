// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Static type descriptors consumed by the population engine.
///
/// A `TypeSpec` describes the shape a `DynamicValue` must have and how it
/// decodes into a `TypedValue`: scalars, binary blobs, arrays, objects with
/// required/optional fields, string enumerations, and ordered-alternative
/// tagged unions ("choices"). Specs are produced by an external schema
/// compiler, materialized once at startup, and shared by `Arc` across every
/// decode call; nothing here is mutated at run time.
///
/// Descriptors are deserialized from a compact JSON form:
///
/// ```json
/// {
///   "type": "object",
///   "properties": {
///     "name":  { "type": "string" },
///     "tags":  { "type": "array", "items": { "type": "string" } },
///     "level": { "type": "string", "enum": ["debug", "info"], "name": "Level" },
///     "value": { "choices": [
///       { "type": "array", "items": { "type": "integer" } },
///       { "type": "integer" }
///     ] }
///   },
///   "required": ["name"]
/// }
/// ```
///
/// Property declaration order is preserved and drives the order in which
/// fields are checked, so the first offending field in declaration order is
/// the one reported. Choice alternatives may carry an explicit `"name"`;
/// otherwise the name is derived from the alternative's shape (an array of
/// integers becomes `integers`), which is what the diagnostics print.
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::schema::error::PopulateError;
use crate::schema::populate::{Populator, TypedValue};
use crate::DynamicValue;

pub mod error;
pub mod params;
pub mod populate;
pub mod registry;

/// The four scalar kinds a `DynamicValue` leaf can decode into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Double,
    Boolean,
}

impl ScalarKind {
    /// Name used both as the descriptor tag and in diagnostics.
    pub fn kind_name(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Double => "double",
            ScalarKind::Boolean => "boolean",
        }
    }
}

/// Static description of an expected value shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Scalar(ScalarKind),
    Binary,
    Object(ObjectSpec),
    ArrayOf(Arc<TypeSpec>),
    Choice(ChoiceSpec),
    EnumOf(EnumSpec),
}

/// Field list of an object type, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpec {
    pub fields: Arc<Vec<FieldSpec>>,
}

impl ObjectSpec {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name.as_ref() == name)
    }
}

/// A single named slot of an object type or parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: Arc<str>,
    pub required: bool,
    pub spec: Arc<TypeSpec>,
}

/// Ordered alternatives of a tagged union. The first alternative whose
/// coarse tag matches the value is committed; deeper failures are not
/// retried against later alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSpec {
    pub alternatives: Arc<Vec<ChoiceAlt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceAlt {
    pub name: Arc<str>,
    pub spec: Arc<TypeSpec>,
}

/// A string constrained to a fixed allowed set. `name` is the display name
/// the diagnostics use, which the generator derives from the enum's type
/// name rather than from the field key.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSpec {
    pub name: Arc<str>,
    pub values: Arc<Vec<Arc<str>>>,
}

impl TypeSpec {
    /// Parse a JSON type descriptor into a `TypeSpec`.
    /// Provides better error messages than `serde_json::from_value`.
    pub fn from_serde_json_value(
        descriptor: serde_json::Value,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let spec = serde_json::from_value::<TypeSpec>(descriptor)
            .map_err(|e| format!("Failed to parse type descriptor: {e}"))?;
        Ok(spec)
    }

    /// Parse a JSON type descriptor from a string into a `TypeSpec`.
    pub fn from_json_str(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|e| format!("Failed to parse type descriptor: {e}"))?;
        Self::from_serde_json_value(value)
    }

    /// Decode `value` against this spec.
    ///
    /// # Example
    /// ```rust
    /// use typefill::{DynamicValue, TypeSpec};
    ///
    /// let spec = TypeSpec::from_json_str(r#"{ "type": "integer" }"#).unwrap();
    /// let value = DynamicValue::from(5);
    ///
    /// assert!(spec.populate(&value).is_ok());
    /// ```
    pub fn populate(&self, value: &DynamicValue) -> Result<TypedValue, PopulateError> {
        Populator::populate(value, self)
    }

    /// Whether `value`'s coarse tag can select this spec. Choice resolution
    /// commits on this check alone, before any deep validation.
    pub(crate) fn matches_tag(&self, value: &DynamicValue) -> bool {
        match self {
            TypeSpec::Scalar(ScalarKind::String) => matches!(value, DynamicValue::String(_)),
            TypeSpec::Scalar(ScalarKind::Integer) => matches!(value, DynamicValue::Int(_)),
            TypeSpec::Scalar(ScalarKind::Double) => matches!(value, DynamicValue::Double(_)),
            TypeSpec::Scalar(ScalarKind::Boolean) => matches!(value, DynamicValue::Bool(_)),
            TypeSpec::Binary => matches!(value, DynamicValue::Binary(_)),
            TypeSpec::Object(_) => matches!(value, DynamicValue::Dict(_)),
            TypeSpec::ArrayOf(_) => matches!(value, DynamicValue::List(_)),
            TypeSpec::EnumOf(_) => matches!(value, DynamicValue::String(_)),
            TypeSpec::Choice(choice) => {
                choice.alternatives.iter().any(|alt| alt.spec.matches_tag(value))
            }
        }
    }

    /// Display name for a choice alternative whose descriptor carries no
    /// explicit `"name"`, derived the way the schema compiler derives it.
    fn default_alternative_name(&self) -> String {
        match self {
            TypeSpec::Scalar(kind) => kind.kind_name().to_string(),
            TypeSpec::Binary => "binary".to_string(),
            TypeSpec::Object(_) => "object".to_string(),
            TypeSpec::ArrayOf(items) => format!("{}s", items.default_alternative_name()),
            TypeSpec::EnumOf(e) => e.name.to_string(),
            TypeSpec::Choice(_) => "choice".to_string(),
        }
    }

    pub(crate) fn from_descriptor(v: &serde_json::Value) -> Result<TypeSpec, String> {
        let Some(fields) = v.as_object() else {
            return Err(format!("type descriptor must be an object, got {v}"));
        };

        if let Some(choices) = fields.get("choices") {
            let Some(list) = choices.as_array() else {
                return Err("\"choices\" must be an array of type descriptors".to_string());
            };
            if list.is_empty() {
                return Err("\"choices\" must declare at least one alternative".to_string());
            }
            let mut alternatives = Vec::with_capacity(list.len());
            for alt in list {
                let spec = TypeSpec::from_descriptor(alt)?;
                let name = match alt.get("name").and_then(|n| n.as_str()) {
                    Some(n) => n.to_string(),
                    None => spec.default_alternative_name(),
                };
                alternatives.push(ChoiceAlt {
                    name: name.into(),
                    spec: Arc::new(spec),
                });
            }
            return Ok(TypeSpec::Choice(ChoiceSpec {
                alternatives: Arc::new(alternatives),
            }));
        }

        if let Some(values) = fields.get("enum") {
            let Some(list) = values.as_array() else {
                return Err("\"enum\" must be an array of strings".to_string());
            };
            let mut allowed = Vec::with_capacity(list.len());
            for value in list {
                match value.as_str() {
                    Some(s) => allowed.push(Arc::<str>::from(s)),
                    None => return Err(format!("\"enum\" values must be strings, got {value}")),
                }
            }
            let name = fields.get("name").and_then(|n| n.as_str()).unwrap_or("enum");
            return Ok(TypeSpec::EnumOf(EnumSpec {
                name: name.into(),
                values: Arc::new(allowed),
            }));
        }

        let Some(tag) = fields.get("type").and_then(|t| t.as_str()) else {
            return Err(format!("type descriptor needs a \"type\" tag: {v}"));
        };
        match tag {
            "string" => Ok(TypeSpec::Scalar(ScalarKind::String)),
            "integer" => Ok(TypeSpec::Scalar(ScalarKind::Integer)),
            // "number" is the schema compiler's historical spelling.
            "double" | "number" => Ok(TypeSpec::Scalar(ScalarKind::Double)),
            "boolean" => Ok(TypeSpec::Scalar(ScalarKind::Boolean)),
            "binary" => Ok(TypeSpec::Binary),
            "array" => {
                let Some(items) = fields.get("items") else {
                    return Err("array descriptor needs \"items\"".to_string());
                };
                Ok(TypeSpec::ArrayOf(Arc::new(TypeSpec::from_descriptor(items)?)))
            }
            "object" => {
                let properties = match fields.get("properties") {
                    Some(p) => match p.as_object() {
                        Some(p) => Some(p),
                        None => return Err("\"properties\" must be an object".to_string()),
                    },
                    None => None,
                };
                let mut required = Vec::new();
                if let Some(names) = fields.get("required") {
                    let Some(names) = names.as_array() else {
                        return Err("\"required\" must be an array of field names".to_string());
                    };
                    for name in names {
                        match name.as_str() {
                            Some(s) => required.push(s),
                            None => {
                                return Err(format!("\"required\" entries must be strings, got {name}"))
                            }
                        }
                    }
                }
                let mut specs = Vec::new();
                if let Some(properties) = properties {
                    // serde_json's preserve_order feature keeps declaration
                    // order here, which fixes the field check order.
                    for (name, prop) in properties {
                        specs.push(FieldSpec {
                            name: name.as_str().into(),
                            required: required.contains(&name.as_str()),
                            spec: Arc::new(TypeSpec::from_descriptor(prop)?),
                        });
                    }
                }
                Ok(TypeSpec::Object(ObjectSpec {
                    fields: Arc::new(specs),
                }))
            }
            other => Err(format!("unsupported type descriptor tag: {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for TypeSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v: serde_json::Value = Deserialize::deserialize(deserializer)?;
        TypeSpec::from_descriptor(&v).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    mod params;
    mod populate;
    mod registry;
    mod suite;
}
