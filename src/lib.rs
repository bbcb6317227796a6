// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod value;

pub mod schema;

pub use schema::error::PopulateError;
pub use schema::params::{ParamListSpec, TypedParams};
pub use schema::populate::{Populator, TypedRecord, TypedValue};
pub use schema::registry::{SpecRegistry, SpecRegistryError, GENERATED_SPECS};
pub use schema::{ChoiceAlt, ChoiceSpec, EnumSpec, FieldSpec, ObjectSpec, ScalarKind, TypeSpec};
pub use value::DynamicValue;
