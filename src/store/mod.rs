//! Persistence adapter: the document store behind every resource
//! collection. Two implementations — in-process (dev/tests) and
//! PostgreSQL JSONB.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

/// A stored record: one JSON object per document.
pub type Document = serde_json::Map<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key: {field}")]
    DuplicateKey { field: String },
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

/// One page request: exact-match filters, skip/limit, and a sort key.
/// `tie_breaker` (the resource id field) makes the ordering total so
/// pages never overlap or drop records on sort-key ties.
#[derive(Clone, Debug)]
pub struct PageQuery {
    pub filter: Vec<(String, Value)>,
    pub skip: u64,
    pub limit: u64,
    pub sort_field: String,
    pub descending: bool,
    pub tie_breaker: String,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document. Fails with `DuplicateKey` when a declared
    /// unique field of the collection is violated.
    async fn insert(&self, collection: &str, record: Document) -> Result<Document, StoreError>;

    /// Exact-match lookup on a single field (id or natural key).
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// One page of documents plus the total count of matches.
    async fn find_page(
        &self,
        collection: &str,
        query: &PageQuery,
    ) -> Result<(Vec<Document>, u64), StoreError>;

    /// Full-document replacement by id. Returns the stored document, or
    /// None when the id does not exist.
    async fn replace_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
        record: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Hard delete by id. Returns the removed document, or None.
    async fn delete_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Liveness probe for the readiness endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
