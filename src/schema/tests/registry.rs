// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::assertions_on_result_states
)] // registry tests unwrap/panic to assert error flows

use std::sync::Arc;

use serde_json::json;

use crate::schema::registry::GENERATED_SPECS;
use crate::{SpecRegistry, SpecRegistryError, TypeSpec};

fn int_spec() -> Arc<TypeSpec> {
    Arc::new(TypeSpec::from_serde_json_value(json!({ "type": "integer" })).unwrap())
}

#[test]
fn register_and_get_share_the_spec() {
    let registry = SpecRegistry::new();
    let spec = int_spec();

    registry.register("test.Count", Arc::clone(&spec)).unwrap();
    let fetched = registry.get("test.Count").unwrap();
    assert!(Arc::ptr_eq(&fetched, &spec));
}

#[test]
fn duplicate_registration_is_rejected_and_first_wins() {
    let registry = SpecRegistry::new();
    let first = int_spec();
    let second = Arc::new(TypeSpec::from_serde_json_value(json!({ "type": "string" })).unwrap());

    registry.register("test.Slot", Arc::clone(&first)).unwrap();
    let err = registry.register("test.Slot", second).unwrap_err();
    assert_eq!(err, SpecRegistryError::AlreadyExists(Arc::from("test.Slot")));

    let fetched = registry.get("test.Slot").unwrap();
    assert!(Arc::ptr_eq(&fetched, &first));
}

#[test]
fn empty_or_whitespace_names_are_rejected() {
    let registry = SpecRegistry::new();

    assert_eq!(
        registry.register("", int_spec()).unwrap_err(),
        SpecRegistryError::InvalidName(Arc::from(""))
    );
    assert_eq!(
        registry.register("   ", int_spec()).unwrap_err(),
        SpecRegistryError::InvalidName(Arc::from("   "))
    );
    assert!(registry.is_empty());
}

#[test]
fn lookup_helpers() {
    let registry = SpecRegistry::new();
    registry.register("a", int_spec()).unwrap();
    registry.register("b", int_spec()).unwrap();

    assert!(registry.contains("a"));
    assert!(!registry.contains("c"));
    assert_eq!(registry.len(), 2);
    assert!(!registry.is_empty());

    let mut names = registry.list_names();
    names.sort();
    assert_eq!(names, vec![Arc::<str>::from("a"), Arc::<str>::from("b")]);
}

#[test]
fn global_registry_serves_generated_specs() {
    let name = "typefill.tests.GlobalSpec";
    GENERATED_SPECS.register(name, int_spec()).unwrap();
    assert!(GENERATED_SPECS.get(name).is_some());
}
