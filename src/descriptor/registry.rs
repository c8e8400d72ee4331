//! Catalog validation and lookup: descriptors checked for internal
//! consistency once at startup, then served by path segment.

use std::collections::HashMap;

use serde_json::Value;

use crate::descriptor::types::{FieldType, ResourceDescriptor, Schema};
use crate::error::ConfigError;

#[derive(Debug)]
pub struct Registry {
    by_path: HashMap<String, ResourceDescriptor>,
}

impl Registry {
    pub fn new(descriptors: Vec<ResourceDescriptor>) -> Result<Self, ConfigError> {
        let mut by_path = HashMap::new();
        for desc in descriptors {
            validate_descriptor(&desc)?;
            if by_path.contains_key(&desc.path) {
                return Err(ConfigError::DuplicatePathSegment(desc.path));
            }
            by_path.insert(desc.path.clone(), desc);
        }
        Ok(Registry { by_path })
    }

    pub fn by_path(&self, path: &str) -> Option<&ResourceDescriptor> {
        self.by_path.get(path)
    }

    pub fn resources(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.by_path.values()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

fn validate_descriptor(desc: &ResourceDescriptor) -> Result<(), ConfigError> {
    if desc.schema.field(&desc.id_field).is_some() {
        return Err(ConfigError::IdFieldInSchema {
            resource: desc.path.clone(),
            field: desc.id_field.clone(),
        });
    }

    for field in &desc.unique_fields {
        if desc.schema.field(field).is_none() {
            return Err(ConfigError::UnknownField {
                resource: desc.path.clone(),
                field: field.clone(),
                role: "unique key",
            });
        }
    }

    if let Some(alt) = &desc.alternate_lookup {
        if !desc.unique_fields.iter().any(|f| f == alt) {
            return Err(ConfigError::AlternateNotUnique {
                resource: desc.path.clone(),
                field: alt.clone(),
            });
        }
    }

    for field in &desc.filters {
        if desc.schema.field(field).is_none() {
            return Err(ConfigError::UnknownField {
                resource: desc.path.clone(),
                field: field.clone(),
                role: "filter",
            });
        }
    }

    let sort_ok = desc.sort_field == "created_date"
        || desc.sort_field == "last_updated"
        || desc.schema.field(&desc.sort_field).is_some();
    if !sort_ok {
        return Err(ConfigError::UnknownField {
            resource: desc.path.clone(),
            field: desc.sort_field.clone(),
            role: "sort key",
        });
    }

    if desc.captures_creator && !desc.requires_auth {
        return Err(ConfigError::CreatorWithoutAuth {
            resource: desc.path.clone(),
        });
    }

    validate_schema(&desc.path, &desc.schema)
}

fn validate_schema(resource: &str, schema: &Schema) -> Result<(), ConfigError> {
    for field in &schema.fields {
        if let Some(pattern) = &field.pattern {
            if regex::Regex::new(pattern).is_err() {
                return Err(ConfigError::InvalidPattern {
                    resource: resource.to_string(),
                    field: field.name.clone(),
                });
            }
        }
        if let Some(default) = &field.default {
            check_default(resource, &field.name, &field.field_type, default)?;
        }
        match &field.field_type {
            FieldType::Object(sub) => validate_schema(resource, sub)?,
            FieldType::Array(element) => {
                if let FieldType::Object(sub) = element.as_ref() {
                    validate_schema(resource, sub)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_default(
    resource: &str,
    field: &str,
    field_type: &FieldType,
    default: &Value,
) -> Result<(), ConfigError> {
    let ok = match field_type {
        FieldType::Enum(values) => default
            .as_str()
            .map(|s| values.iter().any(|v| v == s))
            .unwrap_or(false),
        FieldType::String => default.is_string(),
        FieldType::Number => default.is_number(),
        FieldType::Boolean => default.is_boolean(),
        FieldType::Date => default.is_string(),
        FieldType::Array(_) | FieldType::Object(_) => false,
    };
    if ok {
        Ok(())
    } else if matches!(field_type, FieldType::Enum(_)) {
        Err(ConfigError::DefaultOutsideEnum {
            resource: resource.to_string(),
            field: field.to_string(),
        })
    } else {
        Err(ConfigError::DefaultTypeMismatch {
            resource: resource.to_string(),
            field: field.to_string(),
        })
    }
}
