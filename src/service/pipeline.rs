//! The generic CRUD pipeline: validate, enrich (id + timestamps +
//! creator), persist, shape. One executor for every resource in the
//! catalog; per-resource behavior comes entirely from the descriptor.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::descriptor::{ResourceDescriptor, SortDirection, UpdateSemantics};
use crate::error::AppError;
use crate::ident;
use crate::response::{ListEnvelope, Pagination};
use crate::service::validation::{self, parse_date, rfc3339_millis};
use crate::store::{Document, DocumentStore, PageQuery, StoreError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 1000;
/// Identifier collisions are retried with a fresh id before giving up.
const ID_ATTEMPTS: u32 = 3;

pub struct Pipeline {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl Pipeline {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_timeout(store, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Pipeline { store, timeout }
    }

    /// Every store call runs under the per-request timeout; exceeding it
    /// is a distinct `Timeout` failure, not an adapter fault.
    async fn store_call<T, F>(&self, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_store_error(e)),
            Err(_) => Err(AppError::Timeout),
        }
    }

    fn authorize(&self, desc: &ResourceDescriptor, caller: Option<&str>) -> Result<(), AppError> {
        if desc.requires_auth && caller.is_none() {
            return Err(AppError::Unauthorized);
        }
        Ok(())
    }

    pub async fn create(
        &self,
        desc: &ResourceDescriptor,
        caller: Option<&str>,
        body: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        self.authorize(desc, caller)?;
        let validated = validation::validate(body, &desc.schema).map_err(AppError::Validation)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut doc = validated.clone();
            let id = ident::generate(&desc.id_strategy);
            let now = rfc3339_millis(Utc::now());
            doc.insert(desc.id_field.clone(), Value::String(id));
            doc.insert("created_date".to_string(), Value::String(now.clone()));
            doc.insert("last_updated".to_string(), Value::String(now));
            if desc.captures_creator {
                if let Some(caller) = caller {
                    doc.insert("created_by".to_string(), Value::String(caller.to_string()));
                }
            }

            let inserted = tokio::time::timeout(
                self.timeout,
                self.store.insert(&desc.collection, doc),
            )
            .await;
            match inserted {
                Err(_) => return Err(AppError::Timeout),
                Ok(Ok(created)) => return Ok(Value::Object(created)),
                Ok(Err(StoreError::DuplicateKey { field }))
                    if field == desc.id_field && attempt < ID_ATTEMPTS =>
                {
                    tracing::warn!(
                        resource = %desc.path,
                        attempt,
                        "generated identifier collided, retrying with a fresh one"
                    );
                }
                Ok(Err(e)) => return Err(map_store_error(e)),
            }
        }
    }

    pub async fn list(
        &self,
        desc: &ResourceDescriptor,
        caller: Option<&str>,
        params: &HashMap<String, String>,
    ) -> Result<ListEnvelope, AppError> {
        self.authorize(desc, caller)?;

        let page = parse_positive(params.get("page")).unwrap_or(1);
        let limit = parse_positive(params.get("limit"))
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        let skip = (page - 1) * limit;

        // Only whitelisted parameters become filters; anything else is
        // ignored, not an error.
        let mut filter = Vec::new();
        for field in &desc.filters {
            if let Some(raw) = params.get(field) {
                filter.push((field.clone(), coerce_filter_value(desc, field, raw)));
            }
        }

        let query = PageQuery {
            filter,
            skip,
            limit,
            sort_field: desc.sort_field.clone(),
            descending: desc.sort_direction == SortDirection::Descending,
            tie_breaker: desc.id_field.clone(),
        };
        let (docs, total) = self
            .store_call(self.store.find_page(&desc.collection, &query))
            .await?;
        Ok(ListEnvelope {
            data: docs.into_iter().map(Value::Object).collect(),
            pagination: Pagination::new(total, page, limit),
        })
    }

    pub async fn get(
        &self,
        desc: &ResourceDescriptor,
        caller: Option<&str>,
        id: &str,
    ) -> Result<Value, AppError> {
        self.authorize(desc, caller)?;
        let doc = self.lookup(desc, id).await?;
        doc.map(Value::Object)
            .ok_or_else(|| AppError::NotFound(format!("record '{}'", id)))
    }

    pub async fn update(
        &self,
        desc: &ResourceDescriptor,
        caller: Option<&str>,
        id: &str,
        body: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        self.authorize(desc, caller)?;
        // Validation comes first: a bad payload must never touch the
        // stored record, and callers see 400 before 404.
        let patch = match desc.update {
            UpdateSemantics::Replace => validation::validate(body, &desc.schema),
            UpdateSemantics::Merge => validation::validate_partial(body, &desc.schema),
        }
        .map_err(AppError::Validation)?;

        let existing = self
            .lookup(desc, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("record '{}'", id)))?;

        let mut doc = match desc.update {
            UpdateSemantics::Replace => patch,
            UpdateSemantics::Merge => {
                let mut merged = existing.clone();
                for (k, v) in patch {
                    merged.insert(k, v);
                }
                merged
            }
        };
        for field in desc.protected_fields() {
            match existing.get(field) {
                Some(value) => {
                    doc.insert(field.to_string(), value.clone());
                }
                None => {
                    doc.remove(field);
                }
            }
        }
        doc.insert(
            "last_updated".to_string(),
            Value::String(rfc3339_millis(Utc::now())),
        );

        let real_id = stored_id(desc, &existing, id);
        let updated = self
            .store_call(
                self.store
                    .replace_by_id(&desc.collection, &desc.id_field, &real_id, doc),
            )
            .await?;
        updated
            .map(Value::Object)
            .ok_or_else(|| AppError::NotFound(format!("record '{}'", id)))
    }

    pub async fn delete(
        &self,
        desc: &ResourceDescriptor,
        caller: Option<&str>,
        id: &str,
    ) -> Result<Value, AppError> {
        self.authorize(desc, caller)?;
        let existing = self
            .lookup(desc, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("record '{}'", id)))?;
        let real_id = stored_id(desc, &existing, id);
        let deleted = self
            .store_call(
                self.store
                    .delete_by_id(&desc.collection, &desc.id_field, &real_id),
            )
            .await?;
        deleted
            .map(Value::Object)
            .ok_or_else(|| AppError::NotFound(format!("record '{}'", id)))
    }

    /// Lookup by the id field first; dual-key resources then try their
    /// alternate unique key, in that fixed order.
    async fn lookup(
        &self,
        desc: &ResourceDescriptor,
        id: &str,
    ) -> Result<Option<Document>, AppError> {
        let found = self
            .store_call(self.store.find_by_field(&desc.collection, &desc.id_field, id))
            .await?;
        if found.is_some() {
            return Ok(found);
        }
        if let Some(alt) = &desc.alternate_lookup {
            return self
                .store_call(self.store.find_by_field(&desc.collection, alt, id))
                .await;
        }
        Ok(None)
    }
}

/// The id value actually stored on the record; differs from the path
/// parameter when the caller looked the record up by its alternate key.
fn stored_id(desc: &ResourceDescriptor, existing: &Document, fallback: &str) -> String {
    existing
        .get(&desc.id_field)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

fn map_store_error(e: StoreError) -> AppError {
    match e {
        StoreError::DuplicateKey { field } => AppError::Conflict(field),
        other => AppError::Store(other),
    }
}

fn parse_positive(raw: Option<&String>) -> Option<u64> {
    raw.and_then(|v| v.parse::<u64>().ok()).filter(|n| *n >= 1)
}

/// Filters arrive as strings; coerce to the field's stored shape so
/// exact-match comparison works.
fn coerce_filter_value(desc: &ResourceDescriptor, field: &str, raw: &str) -> Value {
    match desc.schema.field(field).map(|f| &f.field_type) {
        Some(crate::descriptor::FieldType::Number) => raw
            .parse::<f64>()
            .ok()
            .and_then(|n| serde_json::Number::from_f64(n).map(Value::Number))
            .unwrap_or_else(|| Value::String(raw.to_string())),
        Some(crate::descriptor::FieldType::Boolean) => match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        Some(crate::descriptor::FieldType::Date) => parse_date(raw)
            .map(|dt| Value::String(rfc3339_millis(dt)))
            .unwrap_or_else(|| Value::String(raw.to_string())),
        _ => Value::String(raw.to_string()),
    }
}
