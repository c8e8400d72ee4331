//! Shared test fixtures: an in-memory stack and a generic valid-body
//! generator driven by the resource descriptors themselves.
#![allow(dead_code)]

use std::sync::Arc;

use erp_sdk::descriptor::{FieldType, ResourceDescriptor, Schema};
use erp_sdk::{catalog, AppState, MemoryStore, Pipeline, Registry};
use serde_json::{json, Map, Value};

pub const TEST_USER: &str = "qa-user";

pub fn registry() -> Arc<Registry> {
    Arc::new(Registry::new(catalog()).expect("catalog must validate"))
}

pub fn memory_state() -> AppState {
    let registry = registry();
    let store = MemoryStore::new();
    store.ensure_collections(&registry);
    AppState::new(registry, Arc::new(store))
}

pub fn memory_pipeline() -> (Arc<Registry>, Pipeline) {
    let registry = registry();
    let store = MemoryStore::new();
    store.ensure_collections(&registry);
    (registry, Pipeline::new(Arc::new(store)))
}

/// A minimal valid body for a resource: every required field filled
/// with a type-appropriate value. Defaulted and optional fields are
/// left out so tests also exercise default population.
pub fn sample_body(desc: &ResourceDescriptor) -> Map<String, Value> {
    sample_object(&desc.schema)
}

fn sample_object(schema: &Schema) -> Map<String, Value> {
    let mut body = Map::new();
    for field in &schema.fields {
        if !field.required || field.default.is_some() {
            continue;
        }
        body.insert(
            field.name.clone(),
            sample_value(&field.name, &field.field_type),
        );
    }
    body
}

fn sample_value(name: &str, field_type: &FieldType) -> Value {
    match field_type {
        FieldType::String => json!(sample_string(name)),
        FieldType::Number => json!(5),
        FieldType::Boolean => json!(true),
        FieldType::Date => json!("2024-01-15T10:30:00Z"),
        FieldType::Enum(values) => json!(values[0]),
        FieldType::Array(element) => json!([sample_value(name, element)]),
        FieldType::Object(schema) => Value::Object(sample_object(schema)),
    }
}

/// Patterned fields need shapes a generic placeholder cannot satisfy.
fn sample_string(name: &str) -> String {
    match name {
        "gstin" => "27ABCDE1234F1Z5".to_string(),
        "state_code" => "27".to_string(),
        "email" => "user@example.com".to_string(),
        _ => "sample".to_string(),
    }
}

pub fn as_object(value: &Value) -> &Map<String, Value> {
    value.as_object().expect("record must be a JSON object")
}

pub fn str_field<'a>(value: &'a Value, field: &str) -> &'a str {
    as_object(value)
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing string field '{}'", field))
}
