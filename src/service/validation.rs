//! Request validation against a resource schema: type checks, date
//! coercion, enum sets, numeric bounds, defaults, and nested
//! sub-documents. Collects every violation instead of stopping at the
//! first; never panics.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{Map, Value};

use crate::descriptor::{FieldSpec, FieldType, Schema};
use crate::error::Violation;
use crate::store::Document;

/// Canonical timestamp form used everywhere a date is stored: UTC,
/// millisecond precision, fixed width (lexicographic order == time order).
pub fn rfc3339_millis(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Validate a full document: required fields enforced, defaults
/// populated, unknown fields dropped. Returns the normalized document
/// or every violation found.
pub fn validate(body: &Map<String, Value>, schema: &Schema) -> Result<Document, Vec<Violation>> {
    let mut normalized = Document::new();
    let mut violations = Vec::new();
    validate_into(body, schema, "", false, &mut normalized, &mut violations);
    if violations.is_empty() {
        Ok(normalized)
    } else {
        Err(violations)
    }
}

/// Validate only the fields present in `body` (merge patches):
/// required-ness is not enforced and defaults are not applied.
pub fn validate_partial(
    body: &Map<String, Value>,
    schema: &Schema,
) -> Result<Document, Vec<Violation>> {
    let mut normalized = Document::new();
    let mut violations = Vec::new();
    validate_into(body, schema, "", true, &mut normalized, &mut violations);
    if violations.is_empty() {
        Ok(normalized)
    } else {
        Err(violations)
    }
}

fn validate_into(
    body: &Map<String, Value>,
    schema: &Schema,
    prefix: &str,
    partial: bool,
    normalized: &mut Document,
    violations: &mut Vec<Violation>,
) {
    for field in &schema.fields {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}{}", prefix, field.name)
        };
        match body.get(&field.name) {
            None => {
                if partial {
                    continue;
                }
                if let Some(default) = &field.default {
                    normalized.insert(field.name.clone(), default.clone());
                } else if field.required {
                    violations.push(Violation::new(path, format!("{} is required", field.name)));
                }
            }
            Some(Value::Null) => {
                if field.required && field.default.is_none() {
                    violations.push(Violation::new(path, format!("{} is required", field.name)));
                } else if let (Some(default), false) = (&field.default, partial) {
                    normalized.insert(field.name.clone(), default.clone());
                } else {
                    normalized.insert(field.name.clone(), Value::Null);
                }
            }
            Some(value) => {
                if let Some(coerced) = coerce(value, field, &path, violations) {
                    normalized.insert(field.name.clone(), coerced);
                }
            }
        }
    }
}

/// Type-check and coerce one value. Pushes violations and returns None
/// on failure.
fn coerce(
    value: &Value,
    field: &FieldSpec,
    path: &str,
    violations: &mut Vec<Violation>,
) -> Option<Value> {
    match &field.field_type {
        FieldType::String => {
            let Some(s) = value.as_str() else {
                violations.push(Violation::new(path, format!("{} must be a string", path)));
                return None;
            };
            if let Some(pattern) = &field.pattern {
                match Regex::new(pattern) {
                    Ok(re) if !re.is_match(s) => {
                        violations.push(Violation::new(
                            path,
                            format!("{} does not match required pattern", path),
                        ));
                        return None;
                    }
                    Ok(_) => {}
                    Err(_) => {
                        violations
                            .push(Violation::new(path, format!("invalid pattern for {}", path)));
                        return None;
                    }
                }
            }
            Some(Value::String(s.to_string()))
        }
        FieldType::Number => {
            let Some(n) = value.as_f64() else {
                violations.push(Violation::new(path, format!("{} must be a number", path)));
                return None;
            };
            if let Some(min) = field.minimum {
                if n < min {
                    violations.push(Violation::new(
                        path,
                        format!("{} must be at least {}", path, min),
                    ));
                    return None;
                }
            }
            Some(value.clone())
        }
        FieldType::Boolean => {
            if !value.is_boolean() {
                violations.push(Violation::new(path, format!("{} must be a boolean", path)));
                return None;
            }
            Some(value.clone())
        }
        FieldType::Date => {
            let parsed = value.as_str().and_then(parse_date);
            match parsed {
                Some(dt) => Some(Value::String(rfc3339_millis(dt))),
                None => {
                    violations
                        .push(Violation::new(path, format!("{} must be a valid date", path)));
                    None
                }
            }
        }
        FieldType::Enum(allowed) => {
            let ok = value
                .as_str()
                .map(|s| allowed.iter().any(|v| v == s))
                .unwrap_or(false);
            if ok {
                Some(value.clone())
            } else {
                violations.push(Violation::new(
                    path,
                    format!("{} must be one of: {}", path, allowed.join(", ")),
                ));
                None
            }
        }
        FieldType::Array(element) => {
            let Some(items) = value.as_array() else {
                violations.push(Violation::new(path, format!("{} must be an array", path)));
                return None;
            };
            let before = violations.len();
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                let element_spec = FieldSpec::required(&item_path, (**element).clone());
                if let Some(coerced) = coerce(item, &element_spec, &item_path, violations) {
                    out.push(coerced);
                }
            }
            // One bad element fails the whole array field.
            if violations.len() > before {
                None
            } else {
                Some(Value::Array(out))
            }
        }
        FieldType::Object(sub_schema) => {
            let Some(obj) = value.as_object() else {
                violations.push(Violation::new(path, format!("{} must be an object", path)));
                return None;
            };
            let before = violations.len();
            let mut nested = Document::new();
            let nested_prefix = format!("{}.", path);
            validate_into(obj, sub_schema, &nested_prefix, false, &mut nested, violations);
            if violations.len() > before {
                None
            } else {
                Some(Value::Object(nested))
            }
        }
    }
}

/// Accepts RFC 3339 or plain `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::{validate, validate_partial};
    use crate::descriptor::{FieldSpec, FieldType, Schema};
    use serde_json::{json, Map, Value};

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("test body must be an object"),
        }
    }

    fn schema() -> Schema {
        Schema::new(vec![
            FieldSpec::required("name", FieldType::String),
            FieldSpec::required("quantity", FieldType::Number).with_minimum(0.0),
            FieldSpec::required("due", FieldType::Date),
            FieldSpec::required(
                "status",
                FieldType::Enum(vec!["Open".into(), "Closed".into()]),
            )
            .with_default(json!("Open")),
            FieldSpec::optional("remarks", FieldType::String),
        ])
    }

    #[test]
    fn populates_defaults_and_drops_unknown_fields() {
        let doc = validate(
            &body(json!({
                "name": "a", "quantity": 1, "due": "2024-03-01", "extra": true
            })),
            &schema(),
        )
        .unwrap();
        assert_eq!(doc.get("status"), Some(&json!("Open")));
        assert!(doc.get("extra").is_none());
        assert_eq!(doc.get("due"), Some(&json!("2024-03-01T00:00:00.000Z")));
    }

    #[test]
    fn reports_every_violation_together() {
        let err = validate(
            &body(json!({ "quantity": -2, "due": "not-a-date", "status": "Bogus" })),
            &schema(),
        )
        .unwrap_err();
        let paths: Vec<&str> = err.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "quantity", "due", "status"]);
    }

    #[test]
    fn rejects_wrong_types() {
        let err = validate(
            &body(json!({ "name": 7, "quantity": "many", "due": "2024-03-01" })),
            &schema(),
        )
        .unwrap_err();
        assert!(err.iter().any(|v| v.message.contains("must be a string")));
        assert!(err.iter().any(|v| v.message.contains("must be a number")));
    }

    #[test]
    fn nested_array_paths_carry_index() {
        let line = Schema::new(vec![
            FieldSpec::required("account_id", FieldType::String),
            FieldSpec::required("debit_amount", FieldType::Number).with_minimum(0.0),
        ]);
        let schema = Schema::new(vec![FieldSpec::required(
            "entries",
            FieldType::Array(Box::new(FieldType::Object(line))),
        )]);
        let err = validate(
            &body(json!({
                "entries": [
                    { "account_id": "A1", "debit_amount": 10 },
                    { "account_id": "A2", "debit_amount": -1 }
                ]
            })),
            &schema,
        )
        .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].path, "entries[1].debit_amount");
    }

    #[test]
    fn scalar_array_elements_are_checked() {
        let schema = Schema::new(vec![FieldSpec::required(
            "skills",
            FieldType::Array(Box::new(FieldType::String)),
        )]);
        let err = validate(&body(json!({ "skills": ["welding", 3] })), &schema).unwrap_err();
        assert_eq!(err[0].path, "skills[1]");
    }

    #[test]
    fn partial_mode_skips_missing_required_fields() {
        let doc = validate_partial(&body(json!({ "remarks": "rush order" })), &schema()).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(doc.get("status").is_none(), "no defaults in partial mode");
    }

    #[test]
    fn partial_mode_still_checks_present_fields() {
        let err = validate_partial(&body(json!({ "status": "Bogus" })), &schema()).unwrap_err();
        assert_eq!(err[0].path, "status");
    }

    #[test]
    fn pattern_mismatch_is_reported() {
        let schema = Schema::new(vec![FieldSpec::required("email", FieldType::String)
            .with_pattern(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")]);
        assert!(validate(&body(json!({ "email": "nope" })), &schema).is_err());
        assert!(validate(&body(json!({ "email": "a@b.co" })), &schema).is_ok());
    }

    #[test]
    fn null_required_field_is_rejected() {
        let err = validate(
            &body(json!({ "name": null, "quantity": 1, "due": "2024-03-01" })),
            &schema(),
        )
        .unwrap_err();
        assert_eq!(err[0].path, "name");
    }
}
