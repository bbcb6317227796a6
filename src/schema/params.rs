// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::schema::error::PopulateError;
use crate::schema::populate::{Populator, TypedValue};
use crate::schema::{FieldSpec, TypeSpec};
use crate::DynamicValue;

/// Ordered positional parameter list for function-call binding.
///
/// Each position is a named, typed, required/optional slot; the declared
/// position count is also the maximum arity. Descriptor form:
///
/// ```json
/// {
///   "parameters": [
///     { "name": "num", "type": "integer" },
///     { "name": "label", "type": "string", "optional": true }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamListSpec {
    pub params: Arc<Vec<FieldSpec>>,
}

impl ParamListSpec {
    pub fn max_args(&self) -> usize {
        self.params.len()
    }

    /// Parse a JSON parameter-list descriptor.
    /// Provides better error messages than `serde_json::from_value`.
    pub fn from_serde_json_value(
        descriptor: serde_json::Value,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let spec = serde_json::from_value::<ParamListSpec>(descriptor)
            .map_err(|e| format!("Failed to parse parameter list descriptor: {e}"))?;
        Ok(spec)
    }

    /// Parse a JSON parameter-list descriptor from a string.
    pub fn from_json_str(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let value: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| format!("Failed to parse parameter list descriptor: {e}"))?;
        Self::from_serde_json_value(value)
    }

    /// Bind a positional argument list against the declared positions.
    ///
    /// The arity check runs before any per-position decoding. Each declared
    /// position then follows the object-field rules under the position's
    /// declared name; a missing trailing position, or a null argument
    /// value, counts as not supplied.
    pub fn create_params(&self, args: &[DynamicValue]) -> Result<TypedParams, PopulateError> {
        if args.len() > self.params.len() {
            return Err(PopulateError::TooManyArguments {
                expected: self.params.len(),
                actual: args.len(),
            });
        }

        let mut slots = Vec::with_capacity(self.params.len());
        for (index, param) in self.params.iter().enumerate() {
            match args.get(index) {
                None | Some(DynamicValue::Null) => {
                    if param.required {
                        return Err(PopulateError::RequiredFieldMissing {
                            field: Arc::clone(&param.name),
                        });
                    }
                    slots.push(None);
                }
                Some(v) => {
                    let decoded =
                        Populator::populate(v, &param.spec).map_err(|e| e.qualify(&param.name))?;
                    slots.push(Some(decoded));
                }
            }
        }

        Ok(TypedParams {
            spec: self.clone(),
            slots,
        })
    }
}

impl<'de> Deserialize<'de> for ParamListSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let v: serde_json::Value = Deserialize::deserialize(deserializer)?;
        // Accept either the `{"parameters": [...]}` wrapper or a bare list.
        let list = match v.get("parameters") {
            Some(parameters) => parameters,
            None => &v,
        };
        let Some(list) = list.as_array() else {
            return Err(D::Error::custom(
                "parameter list descriptor needs a \"parameters\" array",
            ));
        };

        let mut params = Vec::with_capacity(list.len());
        for entry in list {
            let Some(name) = entry.get("name").and_then(|n| n.as_str()) else {
                return Err(D::Error::custom(format!(
                    "parameter descriptor needs a \"name\": {entry}"
                )));
            };
            let optional = entry
                .get("optional")
                .and_then(|o| o.as_bool())
                .unwrap_or(false);
            let spec = TypeSpec::from_descriptor(entry).map_err(D::Error::custom)?;
            params.push(FieldSpec {
                name: name.into(),
                required: !optional,
                spec: Arc::new(spec),
            });
        }

        Ok(ParamListSpec {
            params: Arc::new(params),
        })
    }
}

/// Bound arguments of a single call: one slot per declared position,
/// present or explicitly absent.
#[derive(Debug, Clone)]
pub struct TypedParams {
    spec: ParamListSpec,
    slots: Vec<Option<TypedValue>>,
}

impl TypedParams {
    pub fn spec(&self) -> &ParamListSpec {
        &self.spec
    }

    /// Decoded value of the named position, or `None` when absent or not
    /// declared.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.spec
            .params
            .iter()
            .position(|p| p.name.as_ref() == name)
            .and_then(|i| self.slots.get(i))
            .and_then(|slot| slot.as_ref())
    }

    /// Decoded value at the given position index.
    pub fn get_at(&self, index: usize) -> Option<&TypedValue> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl PartialEq for TypedParams {
    fn eq(&self, other: &Self) -> bool {
        if !Arc::ptr_eq(&self.spec.params, &other.spec.params) {
            if self.spec.params.len() != other.spec.params.len()
                || self
                    .spec
                    .params
                    .iter()
                    .zip(other.spec.params.iter())
                    .any(|(a, b)| a.name != b.name)
            {
                return false;
            }
        }
        self.slots == other.slots
    }
}
