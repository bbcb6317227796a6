// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_debug_implementations)] // populator is a zero-sized marker

use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::schema::error::PopulateError;
use crate::schema::{ChoiceSpec, EnumSpec, ObjectSpec, ScalarKind, TypeSpec};
use crate::DynamicValue;

/// Typed result of a successful decode.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(Arc<str>),
    Binary(Arc<[u8]>),
    /// A validated member of an enumeration.
    Enum(Arc<str>),
    Record(TypedRecord),
    List(Vec<TypedValue>),
    /// A committed choice alternative, tagged with its name.
    Choice {
        alternative: Arc<str>,
        value: Box<TypedValue>,
    },
}

impl TypedValue {
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            TypedValue::Bool(b) => Ok(*b),
            _ => Err(anyhow!("not a bool")),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            TypedValue::Int(n) => Ok(*n),
            _ => Err(anyhow!("not an integer")),
        }
    }

    pub fn as_double(&self) -> Result<f64> {
        match self {
            TypedValue::Double(d) => Ok(*d),
            _ => Err(anyhow!("not a double")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            TypedValue::String(s) => Ok(s.as_ref()),
            _ => Err(anyhow!("not a string")),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            TypedValue::Binary(b) => Ok(b.as_ref()),
            _ => Err(anyhow!("not a binary blob")),
        }
    }

    pub fn as_enum_value(&self) -> Result<&str> {
        match self {
            TypedValue::Enum(s) => Ok(s.as_ref()),
            _ => Err(anyhow!("not an enum member")),
        }
    }

    pub fn as_record(&self) -> Result<&TypedRecord> {
        match self {
            TypedValue::Record(r) => Ok(r),
            _ => Err(anyhow!("not a record")),
        }
    }

    pub fn as_list(&self) -> Result<&[TypedValue]> {
        match self {
            TypedValue::List(items) => Ok(items.as_slice()),
            _ => Err(anyhow!("not a list")),
        }
    }

    pub fn as_choice(&self) -> Result<(&str, &TypedValue)> {
        match self {
            TypedValue::Choice { alternative, value } => Ok((alternative.as_ref(), value)),
            _ => Err(anyhow!("not a choice")),
        }
    }
}

/// Decoded object. One slot per declared field, in declaration order; an
/// optional field that was not supplied holds an explicitly absent slot,
/// distinguishable from any present value.
#[derive(Debug, Clone)]
pub struct TypedRecord {
    spec: ObjectSpec,
    slots: Vec<Option<TypedValue>>,
}

impl TypedRecord {
    pub fn spec(&self) -> &ObjectSpec {
        &self.spec
    }

    /// Decoded value of `field`, or `None` when the field is absent or not
    /// declared by the spec.
    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.spec
            .field_index(field)
            .and_then(|i| self.slots.get(i))
            .and_then(|slot| slot.as_ref())
    }

    pub fn is_present(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

impl PartialEq for TypedRecord {
    fn eq(&self, other: &Self) -> bool {
        if !Arc::ptr_eq(&self.spec.fields, &other.spec.fields) {
            // Records of distinct spec constants compare by field names.
            if self.spec.fields.len() != other.spec.fields.len()
                || self
                    .spec
                    .fields
                    .iter()
                    .zip(other.spec.fields.iter())
                    .any(|(a, b)| a.name != b.name)
            {
                return false;
            }
        }
        self.slots == other.slots
    }
}

/// The recursive decode engine: converts a `DynamicValue` plus a `TypeSpec`
/// into a `TypedValue`, or a single path-qualified `PopulateError`.
pub struct Populator;

impl Populator {
    /// Decode `value` against `spec`.
    ///
    /// Decoding short-circuits: the first offending field, in declaration
    /// order, produces the error and nothing later is checked. Dictionary
    /// keys not named by the spec are ignored.
    ///
    /// # Example
    /// ```rust
    /// use typefill::{DynamicValue, Populator, TypeSpec};
    /// use serde_json::json;
    ///
    /// let spec = TypeSpec::from_serde_json_value(json!({
    ///     "type": "object",
    ///     "properties": { "string": { "type": "string" } },
    ///     "required": ["string"]
    /// }))
    /// .unwrap();
    /// let value = DynamicValue::from(json!({ "string": "bling" }));
    ///
    /// let record = Populator::populate(&value, &spec).unwrap();
    /// ```
    pub fn populate(value: &DynamicValue, spec: &TypeSpec) -> Result<TypedValue, PopulateError> {
        match spec {
            TypeSpec::Scalar(kind) => Self::populate_scalar(value, *kind),
            TypeSpec::Binary => Self::populate_binary(value),
            TypeSpec::Object(object) => Self::populate_object(value, object).map(TypedValue::Record),
            TypeSpec::ArrayOf(items) => Self::populate_array(value, items),
            TypeSpec::Choice(choice) => Self::populate_choice(value, choice),
            TypeSpec::EnumOf(spec) => Self::populate_enum(value, spec),
        }
    }

    fn populate_object(
        value: &DynamicValue,
        object: &ObjectSpec,
    ) -> Result<TypedRecord, PopulateError> {
        let DynamicValue::Dict(dict) = value else {
            return Err(PopulateError::TypeMismatch {
                expected: "dictionary",
                actual: value.type_name(),
            });
        };

        let mut slots = Vec::with_capacity(object.fields.len());
        for field in object.fields.iter() {
            match dict.get(field.name.as_ref()) {
                None => {
                    if field.required {
                        return Err(PopulateError::RequiredFieldMissing {
                            field: Arc::clone(&field.name),
                        });
                    }
                    slots.push(None);
                }
                Some(v) => {
                    let decoded =
                        Self::populate(v, &field.spec).map_err(|e| e.qualify(&field.name))?;
                    slots.push(Some(decoded));
                }
            }
        }

        Ok(TypedRecord {
            spec: object.clone(),
            slots,
        })
    }

    fn populate_array(
        value: &DynamicValue,
        items: &TypeSpec,
    ) -> Result<TypedValue, PopulateError> {
        let DynamicValue::List(list) = value else {
            return Err(PopulateError::TypeMismatch {
                expected: "list",
                actual: value.type_name(),
            });
        };

        let mut decoded = Vec::with_capacity(list.len());
        for (index, item) in list.iter().enumerate() {
            let v = Self::populate(item, items).map_err(|e| PopulateError::ArrayItemInvalid {
                index,
                error: Box::new(e),
            })?;
            decoded.push(v);
        }
        Ok(TypedValue::List(decoded))
    }

    fn populate_choice(
        value: &DynamicValue,
        choice: &ChoiceSpec,
    ) -> Result<TypedValue, PopulateError> {
        for alt in choice.alternatives.iter() {
            if alt.spec.matches_tag(value) {
                // Committed: a deeper failure is not retried against later
                // alternatives.
                return Self::populate(value, &alt.spec)
                    .map(|v| TypedValue::Choice {
                        alternative: Arc::clone(&alt.name),
                        value: Box::new(v),
                    })
                    .map_err(|e| e.qualify(&alt.name));
            }
        }
        Err(PopulateError::NoChoiceMatch {
            alternatives: choice
                .alternatives
                .iter()
                .map(|alt| Arc::clone(&alt.name))
                .collect(),
            actual: value.type_name(),
        })
    }

    fn populate_enum(value: &DynamicValue, spec: &EnumSpec) -> Result<TypedValue, PopulateError> {
        let mismatch = |actual: String| PopulateError::NotInEnum {
            field: Arc::clone(&spec.name),
            allowed: Arc::clone(&spec.values),
            actual,
        };
        match value {
            DynamicValue::String(s) => {
                if spec.values.iter().any(|v| v.as_ref() == s.as_ref()) {
                    Ok(TypedValue::Enum(Arc::clone(s)))
                } else {
                    Err(mismatch(s.to_string()))
                }
            }
            other => Err(mismatch(other.to_string())),
        }
    }

    fn populate_scalar(
        value: &DynamicValue,
        kind: ScalarKind,
    ) -> Result<TypedValue, PopulateError> {
        match (kind, value) {
            (ScalarKind::String, DynamicValue::String(s)) => Ok(TypedValue::String(Arc::clone(s))),
            (ScalarKind::Integer, DynamicValue::Int(n)) => Ok(TypedValue::Int(*n)),
            (ScalarKind::Double, DynamicValue::Double(d)) => Ok(TypedValue::Double(*d)),
            (ScalarKind::Boolean, DynamicValue::Bool(b)) => Ok(TypedValue::Bool(*b)),
            (kind, other) => Err(PopulateError::TypeMismatch {
                expected: kind.kind_name(),
                actual: other.type_name(),
            }),
        }
    }

    fn populate_binary(value: &DynamicValue) -> Result<TypedValue, PopulateError> {
        match value {
            DynamicValue::Binary(b) => Ok(TypedValue::Binary(Arc::clone(b))),
            other => Err(PopulateError::TypeMismatch {
                expected: "binary",
                actual: other.type_name(),
            }),
        }
    }
}
