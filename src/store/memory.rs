//! In-process document store. Backs the test suite and `STORE=memory`
//! development runs; enforces the same uniqueness and paging contract
//! as the PostgreSQL adapter.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::descriptor::Registry;
use crate::store::{Document, DocumentStore, PageQuery, StoreError};

#[derive(Default)]
struct Collection {
    unique_fields: Vec<String>,
    rows: Vec<Document>,
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every catalog collection with its unique-field set.
    pub fn ensure_collections(&self, registry: &Registry) {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        for desc in registry.resources() {
            let mut unique_fields = vec![desc.id_field.clone()];
            unique_fields.extend(desc.unique_fields.iter().cloned());
            collections
                .entry(desc.collection.clone())
                .or_insert_with(|| Collection {
                    unique_fields,
                    rows: Vec::new(),
                });
        }
    }
}

fn field_str<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

/// Sort-key comparison: chronological for date-shaped strings, numeric
/// for numbers, lexicographic otherwise. Missing values sort first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            if let (Some(x), Some(y)) = (as_datetime(a), as_datetime(b)) {
                x.cmp(&y)
            } else if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            } else if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
                x.cmp(y)
            } else {
                Ordering::Equal
            }
        }
    }
}

fn as_datetime(v: &Value) -> Option<DateTime<Utc>> {
    v.as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, record: Document) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        for field in &coll.unique_fields {
            if let Some(value) = record.get(field) {
                if coll.rows.iter().any(|row| row.get(field) == Some(value)) {
                    return Err(StoreError::DuplicateKey {
                        field: field.clone(),
                    });
                }
            }
        }
        coll.rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        let coll = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(coll
            .rows
            .iter()
            .find(|row| field_str(row, field) == Some(value))
            .cloned())
    }

    async fn find_page(
        &self,
        collection: &str,
        query: &PageQuery,
    ) -> Result<(Vec<Document>, u64), StoreError> {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        let coll = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

        let mut matches: Vec<&Document> = coll
            .rows
            .iter()
            .filter(|row| {
                query
                    .filter
                    .iter()
                    .all(|(field, value)| row.get(field) == Some(value))
            })
            .collect();
        let total = matches.len() as u64;

        matches.sort_by(|a, b| {
            let primary = compare_values(a.get(&query.sort_field), b.get(&query.sort_field));
            let ordering = primary.then_with(|| {
                compare_values(a.get(&query.tie_breaker), b.get(&query.tie_breaker))
            });
            if query.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        let page = matches
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
        record: Document,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        let Some(idx) = coll
            .rows
            .iter()
            .position(|row| field_str(row, id_field) == Some(id))
        else {
            return Ok(None);
        };
        for field in &coll.unique_fields {
            if let Some(value) = record.get(field) {
                let clash = coll
                    .rows
                    .iter()
                    .enumerate()
                    .any(|(i, row)| i != idx && row.get(field) == Some(value));
                if clash {
                    return Err(StoreError::DuplicateKey {
                        field: field.clone(),
                    });
                }
            }
        }
        coll.rows[idx] = record.clone();
        Ok(Some(record))
    }

    async fn delete_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        let Some(idx) = coll
            .rows
            .iter()
            .position(|row| field_str(row, id_field) == Some(id))
        else {
            return Ok(None);
        };
        Ok(Some(coll.rows.remove(idx)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
