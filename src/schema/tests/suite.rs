// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::shadow_unrelated,
    clippy::pattern_type_mismatch,
    clippy::assertions_on_result_states
)] // descriptor suite tests panic/unwrap to assert specific spec shapes

use serde_json::json;

use crate::{ParamListSpec, ScalarKind, TypeSpec};

#[test]
fn deserialize_scalars() {
    for (tag, kind) in [
        ("string", ScalarKind::String),
        ("integer", ScalarKind::Integer),
        ("double", ScalarKind::Double),
        ("boolean", ScalarKind::Boolean),
    ] {
        let spec = TypeSpec::from_serde_json_value(json!({ "type": tag })).unwrap();
        assert_eq!(spec, TypeSpec::Scalar(kind), "tag {tag}");
    }
}

#[test]
fn number_is_an_alias_for_double() {
    let spec = TypeSpec::from_serde_json_value(json!({ "type": "number" })).unwrap();
    assert_eq!(spec, TypeSpec::Scalar(ScalarKind::Double));
}

#[test]
fn deserialize_binary() {
    let spec = TypeSpec::from_serde_json_value(json!({ "type": "binary" })).unwrap();
    assert_eq!(spec, TypeSpec::Binary);
}

#[test]
fn deserialize_array_of_items() {
    let spec = TypeSpec::from_serde_json_value(json!({
        "type": "array",
        "items": { "type": "integer" }
    }))
    .unwrap();
    match spec {
        TypeSpec::ArrayOf(items) => assert_eq!(*items, TypeSpec::Scalar(ScalarKind::Integer)),
        _ => panic!("Expected TypeSpec::ArrayOf"),
    }
}

#[test]
fn array_without_items_is_rejected() {
    assert!(TypeSpec::from_serde_json_value(json!({ "type": "array" })).is_err());
}

#[test]
fn object_fields_keep_declaration_order() {
    let spec = TypeSpec::from_serde_json_value(json!({
        "type": "object",
        "properties": {
            "zeta": { "type": "string" },
            "alpha": { "type": "integer" },
            "mid": { "type": "boolean" }
        },
        "required": ["alpha"]
    }))
    .unwrap();

    let TypeSpec::Object(object) = spec else {
        panic!("Expected TypeSpec::Object");
    };
    let names: Vec<&str> = object.fields.iter().map(|f| f.name.as_ref()).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
    let required: Vec<bool> = object.fields.iter().map(|f| f.required).collect();
    assert_eq!(required, [false, true, false]);
    assert_eq!(object.field_index("mid"), Some(2));
    assert_eq!(object.field_index("nope"), None);
}

#[test]
fn object_without_properties_is_empty() {
    let spec = TypeSpec::from_serde_json_value(json!({ "type": "object" })).unwrap();
    let TypeSpec::Object(object) = spec else {
        panic!("Expected TypeSpec::Object");
    };
    assert!(object.fields.is_empty());
}

#[test]
fn deserialize_enum_with_display_name() {
    let spec = TypeSpec::from_serde_json_value(json!({
        "type": "string",
        "enum": ["one", "two", "three"],
        "name": "Enumeration"
    }))
    .unwrap();

    let TypeSpec::EnumOf(spec) = spec else {
        panic!("Expected TypeSpec::EnumOf");
    };
    assert_eq!(spec.name.as_ref(), "Enumeration");
    let values: Vec<&str> = spec.values.iter().map(|v| v.as_ref()).collect();
    assert_eq!(values, ["one", "two", "three"]);
}

#[test]
fn enum_display_name_defaults() {
    let spec = TypeSpec::from_serde_json_value(json!({
        "type": "string",
        "enum": ["a"]
    }))
    .unwrap();
    let TypeSpec::EnumOf(spec) = spec else {
        panic!("Expected TypeSpec::EnumOf");
    };
    assert_eq!(spec.name.as_ref(), "enum");
}

#[test]
fn enum_values_must_be_strings() {
    assert!(TypeSpec::from_serde_json_value(json!({
        "type": "string",
        "enum": ["a", 1]
    }))
    .is_err());
}

#[test]
fn choice_alternative_names_are_derived_from_shape() {
    let spec = TypeSpec::from_serde_json_value(json!({
        "choices": [
            { "type": "array", "items": { "type": "integer" } },
            { "type": "integer" }
        ]
    }))
    .unwrap();

    let TypeSpec::Choice(choice) = spec else {
        panic!("Expected TypeSpec::Choice");
    };
    let names: Vec<&str> = choice.alternatives.iter().map(|a| a.name.as_ref()).collect();
    assert_eq!(names, ["integers", "integer"]);
}

#[test]
fn choice_alternative_name_can_be_overridden() {
    let spec = TypeSpec::from_serde_json_value(json!({
        "choices": [
            { "type": "binary", "name": "blob" },
            { "type": "string" }
        ]
    }))
    .unwrap();

    let TypeSpec::Choice(choice) = spec else {
        panic!("Expected TypeSpec::Choice");
    };
    let names: Vec<&str> = choice.alternatives.iter().map(|a| a.name.as_ref()).collect();
    assert_eq!(names, ["blob", "string"]);
}

#[test]
fn empty_choices_are_rejected() {
    assert!(TypeSpec::from_serde_json_value(json!({ "choices": [] })).is_err());
}

#[test]
fn unknown_type_tag_is_rejected() {
    let err = TypeSpec::from_serde_json_value(json!({ "type": "quaternion" })).unwrap_err();
    assert!(err.to_string().contains("unsupported type descriptor tag"));
}

#[test]
fn missing_type_tag_is_rejected() {
    assert!(TypeSpec::from_serde_json_value(json!({ "minimum": 3 })).is_err());
}

#[test]
fn non_object_descriptor_is_rejected() {
    assert!(TypeSpec::from_serde_json_value(json!("string")).is_err());
}

#[test]
fn from_json_str_parses_descriptors() {
    let spec = TypeSpec::from_json_str(
        r#"{ "type": "array", "items": { "type": "string" } }"#,
    )
    .unwrap();
    assert!(matches!(spec, TypeSpec::ArrayOf(_)));

    assert!(TypeSpec::from_json_str("not json").is_err());
}

#[test]
fn param_list_descriptor_with_wrapper() {
    let spec = ParamListSpec::from_serde_json_value(json!({
        "parameters": [
            { "name": "num", "type": "integer" },
            { "name": "label", "type": "string", "optional": true }
        ]
    }))
    .unwrap();

    assert_eq!(spec.max_args(), 2);
    assert_eq!(spec.params[0].name.as_ref(), "num");
    assert!(spec.params[0].required);
    assert_eq!(spec.params[1].name.as_ref(), "label");
    assert!(!spec.params[1].required);
}

#[test]
fn param_list_descriptor_as_bare_array() {
    let spec = ParamListSpec::from_serde_json_value(json!([
        { "name": "only", "type": "boolean" }
    ]))
    .unwrap();
    assert_eq!(spec.max_args(), 1);
    assert_eq!(spec.params[0].name.as_ref(), "only");
}

#[test]
fn param_without_a_name_is_rejected() {
    assert!(ParamListSpec::from_serde_json_value(json!({
        "parameters": [ { "type": "integer" } ]
    }))
    .is_err());
}

#[test]
fn nested_descriptors_compose() {
    let spec = TypeSpec::from_serde_json_value(json!({
        "type": "object",
        "properties": {
            "entries": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "kind": { "type": "string", "enum": ["a", "b"], "name": "Kind" },
                        "payload": { "choices": [
                            { "type": "binary" },
                            { "type": "string" }
                        ] }
                    },
                    "required": ["kind"]
                }
            }
        }
    }))
    .unwrap();

    let TypeSpec::Object(object) = &spec else {
        panic!("Expected TypeSpec::Object");
    };
    let TypeSpec::ArrayOf(items) = &*object.fields[0].spec else {
        panic!("Expected TypeSpec::ArrayOf");
    };
    let TypeSpec::Object(entry) = &**items else {
        panic!("Expected TypeSpec::Object for items");
    };
    assert_eq!(entry.fields.len(), 2);
    assert!(matches!(&*entry.fields[0].spec, TypeSpec::EnumOf(_)));
    assert!(matches!(&*entry.fields[1].spec, TypeSpec::Choice(_)));
}

#[test]
fn specs_and_values_cross_thread_boundaries() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<crate::DynamicValue>();
    assert_send_sync::<TypeSpec>();
    assert_send_sync::<ParamListSpec>();
    assert_send_sync::<crate::TypedValue>();
}
