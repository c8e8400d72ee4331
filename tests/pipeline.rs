//! End-to-end pipeline behavior over the in-memory store: create/read
//! round trips, timestamp stamping, pagination laws, update atomicity,
//! dual-key lookup, merge patches, uniqueness, auth, retries, timeouts.

mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{memory_pipeline, sample_body, str_field, TEST_USER};
use erp_sdk::store::{Document, DocumentStore, PageQuery, StoreError};
use erp_sdk::{AppError, MemoryStore, Pipeline, Registry};
use serde_json::{json, Map};

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn create_then_get_round_trips_with_injected_fields() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("batch-cards").unwrap();

    let body = sample_body(desc);
    let created = pipeline.create(desc, Some(TEST_USER), &body).await.unwrap();

    let id = str_field(&created, "batch_id");
    assert!(id.starts_with("BATCH-"));
    assert_eq!(str_field(&created, "created_by"), TEST_USER);
    assert_eq!(str_field(&created, "status"), "In Progress");
    assert_eq!(str_field(&created, "quality_status"), "Pending");
    assert_eq!(
        str_field(&created, "created_date"),
        str_field(&created, "last_updated")
    );

    let fetched = pipeline.get(desc, Some(TEST_USER), id).await.unwrap();
    assert_eq!(fetched, created);
    // Input fields survive verbatim.
    assert_eq!(str_field(&fetched, "product_code"), "sample");
}

#[tokio::test]
async fn last_updated_moves_forward_on_update() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("batch-cards").unwrap();

    let created = pipeline
        .create(desc, Some(TEST_USER), &sample_body(desc))
        .await
        .unwrap();
    let id = str_field(&created, "batch_id").to_string();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let updated = pipeline
        .update(desc, Some(TEST_USER), &id, &sample_body(desc))
        .await
        .unwrap();
    assert_eq!(
        str_field(&updated, "created_date"),
        str_field(&created, "created_date")
    );
    assert!(str_field(&updated, "last_updated") > str_field(&updated, "created_date"));
}

#[tokio::test]
async fn full_replacement_drops_absent_fields_but_keeps_engine_fields() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("batch-cards").unwrap();

    let mut body = sample_body(desc);
    body.insert("remarks".into(), json!("first pass"));
    let created = pipeline.create(desc, Some(TEST_USER), &body).await.unwrap();
    let id = str_field(&created, "batch_id").to_string();

    // Replacement payload omits remarks and tries to smuggle engine fields.
    let mut replacement = sample_body(desc);
    replacement.insert("batch_id".into(), json!("BATCH-forged"));
    replacement.insert("created_date".into(), json!("1999-01-01T00:00:00.000Z"));
    replacement.insert("created_by".into(), json!("intruder"));
    let updated = pipeline
        .update(desc, Some(TEST_USER), &id, &replacement)
        .await
        .unwrap();

    assert!(updated.get("remarks").is_none(), "absent fields are dropped");
    assert_eq!(str_field(&updated, "batch_id"), id);
    assert_eq!(
        str_field(&updated, "created_date"),
        str_field(&created, "created_date")
    );
    assert_eq!(str_field(&updated, "created_by"), TEST_USER);
}

#[tokio::test]
async fn invalid_update_leaves_record_unchanged() {
    // Create with a defaulted status, fail an update, delete, and make
    // sure each step observed the previous one exactly.
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("batch-cards").unwrap();

    let created = pipeline
        .create(desc, Some(TEST_USER), &sample_body(desc))
        .await
        .unwrap();
    let id = str_field(&created, "batch_id").to_string();
    assert_eq!(str_field(&created, "status"), "In Progress");

    let mut bad = sample_body(desc);
    bad.insert("status".into(), json!("Bogus"));
    let err = pipeline
        .update(desc, Some(TEST_USER), &id, &bad)
        .await
        .unwrap_err();
    let AppError::Validation(violations) = err else {
        panic!("expected validation error");
    };
    assert!(violations.iter().any(|v| v.path == "status"));

    let stored = pipeline.get(desc, Some(TEST_USER), &id).await.unwrap();
    assert_eq!(stored, created, "failed update must not write anything");

    let deleted = pipeline.delete(desc, Some(TEST_USER), &id).await.unwrap();
    assert_eq!(str_field(&deleted, "batch_id"), id);
    let err = pipeline.get(desc, Some(TEST_USER), &id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn pagination_covers_all_records_without_overlap() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("faqs").unwrap();

    for i in 0..25 {
        let mut body = sample_body(desc);
        body.insert("question".into(), json!(format!("question {}", i)));
        pipeline.create(desc, None, &body).await.unwrap();
    }

    let mut seen = Vec::new();
    let mut last_date: Option<String> = None;
    for page in 1..=3u64 {
        let envelope = pipeline
            .list(
                desc,
                None,
                &params(&[("page", &page.to_string()), ("limit", "10")]),
            )
            .await
            .unwrap();
        assert_eq!(envelope.pagination.total, 25);
        assert_eq!(envelope.pagination.pages, 3);
        assert_eq!(envelope.pagination.page, page);
        let expected_len = if page == 3 { 5 } else { 10 };
        assert_eq!(envelope.data.len(), expected_len);
        for record in &envelope.data {
            // Sorted by created_date descending across page boundaries.
            let date = str_field(record, "created_date").to_string();
            if let Some(prev) = &last_date {
                assert!(*prev >= date);
            }
            last_date = Some(date);
            seen.push(str_field(record, "id").to_string());
        }
    }
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 25, "no duplicates, no omissions");
}

#[tokio::test]
async fn list_defaults_and_ignores_unknown_params() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("work-orders").unwrap();

    for status in ["Pending", "Completed", "Pending"] {
        let mut body = sample_body(desc);
        body.insert("status".into(), json!(status));
        pipeline.create(desc, Some(TEST_USER), &body).await.unwrap();
    }

    // Unrecognized parameters are ignored, not errors.
    let all = pipeline
        .list(
            desc,
            Some(TEST_USER),
            &params(&[("bogus_param", "x"), ("page", "junk")]),
        )
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 3);
    assert_eq!(all.pagination.page, 1, "unparseable page falls back to 1");

    let pending = pipeline
        .list(desc, Some(TEST_USER), &params(&[("status", "Pending")]))
        .await
        .unwrap();
    assert_eq!(pending.pagination.total, 2);
    for record in &pending.data {
        assert_eq!(str_field(record, "status"), "Pending");
    }
}

#[tokio::test]
async fn every_enum_field_in_the_catalog_rejects_out_of_set_values() {
    let (registry, pipeline) = memory_pipeline();
    for desc in registry.resources() {
        let caller = desc.requires_auth.then_some(TEST_USER);
        let enum_fields: Vec<String> = desc
            .schema
            .fields
            .iter()
            .filter(|f| matches!(f.field_type, erp_sdk::descriptor::FieldType::Enum(_)))
            .map(|f| f.name.clone())
            .collect();
        for field in enum_fields {
            let mut body = sample_body(desc);
            body.insert(field.clone(), json!("___not_a_member___"));
            let err = pipeline.create(desc, caller, &body).await.unwrap_err();
            let AppError::Validation(violations) = err else {
                panic!("{}: expected validation error for {}", desc.path, field);
            };
            assert!(
                violations.iter().any(|v| v.path == field),
                "{}: violation missing for {}",
                desc.path,
                field
            );
        }
        // And the untouched sample body is accepted.
        pipeline
            .create(desc, caller, &sample_body(desc))
            .await
            .unwrap_or_else(|e| panic!("{}: sample body rejected: {:?}", desc.path, e));
    }
}

#[tokio::test]
async fn duplicate_natural_key_is_a_conflict() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("process-definitions").unwrap();

    let mut body = sample_body(desc);
    body.insert("process_code".into(), json!("PC-100"));
    pipeline.create(desc, Some(TEST_USER), &body).await.unwrap();

    let mut dup = sample_body(desc);
    dup.insert("process_code".into(), json!("PC-100"));
    let err = pipeline.create(desc, Some(TEST_USER), &dup).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(field) if field == "process_code"));
}

#[tokio::test]
async fn dual_key_resources_resolve_alternate_lookup() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("e-invoices").unwrap();

    let mut body = sample_body(desc);
    body.insert("invoice_number".into(), json!("INV/24-25/0042"));
    let created = pipeline.create(desc, Some(TEST_USER), &body).await.unwrap();
    let id = str_field(&created, "invoice_id").to_string();

    let by_number = pipeline
        .get(desc, Some(TEST_USER), "INV/24-25/0042")
        .await
        .unwrap();
    assert_eq!(str_field(&by_number, "invoice_id"), id);

    // Id lookup always wins; alternate is the second strategy.
    let by_id = pipeline.get(desc, Some(TEST_USER), &id).await.unwrap();
    assert_eq!(by_id, by_number);
}

#[tokio::test]
async fn merge_updates_patch_only_supplied_fields() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("e-invoices").unwrap();

    let created = pipeline
        .create(desc, Some(TEST_USER), &sample_body(desc))
        .await
        .unwrap();
    let id = str_field(&created, "invoice_id").to_string();

    let mut patch = Map::new();
    patch.insert("status".into(), json!("Generated"));
    let updated = pipeline
        .update(desc, Some(TEST_USER), &id, &patch)
        .await
        .unwrap();

    assert_eq!(str_field(&updated, "status"), "Generated");
    assert_eq!(str_field(&updated, "irn"), str_field(&created, "irn"));
    assert_eq!(str_field(&updated, "created_by"), TEST_USER);

    let mut bad = Map::new();
    bad.insert("status".into(), json!("NotAStatus"));
    let err = pipeline
        .update(desc, Some(TEST_USER), &id, &bad)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn auth_gated_resources_reject_anonymous_callers() {
    let (registry, pipeline) = memory_pipeline();
    let gated = registry.by_path("batch-cards").unwrap();
    let err = pipeline.create(gated, None, &sample_body(gated)).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
    let err = pipeline.list(gated, None, &HashMap::new()).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    let open = registry.by_path("faqs").unwrap();
    pipeline.create(open, None, &sample_body(open)).await.unwrap();
}

#[tokio::test]
async fn uuid_resources_get_bare_uuids() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("hsn-codes").unwrap();
    let created = pipeline.create(desc, None, &sample_body(desc)).await.unwrap();
    let id = str_field(&created, "hsn_id");
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(created.get("is_active"), Some(&json!(true)));
}

/// Fails the first N inserts with an id-collision duplicate, then
/// delegates to the real store.
struct CollidingStore {
    inner: MemoryStore,
    failures_left: AtomicU32,
    id_field: String,
}

#[async_trait]
impl DocumentStore for CollidingStore {
    async fn insert(&self, collection: &str, record: Document) -> Result<Document, StoreError> {
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StoreError::DuplicateKey {
                field: self.id_field.clone(),
            });
        }
        self.inner.insert(collection, record).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.inner.find_by_field(collection, field, value).await
    }

    async fn find_page(
        &self,
        collection: &str,
        query: &PageQuery,
    ) -> Result<(Vec<Document>, u64), StoreError> {
        self.inner.find_page(collection, query).await
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
        record: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.inner.replace_by_id(collection, id_field, id, record).await
    }

    async fn delete_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.inner.delete_by_id(collection, id_field, id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

#[tokio::test]
async fn create_retries_through_identifier_collisions() {
    let registry = Arc::new(Registry::new(erp_sdk::catalog()).unwrap());
    let inner = MemoryStore::new();
    inner.ensure_collections(&registry);
    let store = CollidingStore {
        inner,
        failures_left: AtomicU32::new(2),
        id_field: "batch_id".to_string(),
    };
    let pipeline = Pipeline::new(Arc::new(store));
    let desc = registry.by_path("batch-cards").unwrap();

    let created = pipeline
        .create(desc, Some(TEST_USER), &sample_body(desc))
        .await
        .unwrap();
    assert!(str_field(&created, "batch_id").starts_with("BATCH-"));
}

/// A store whose reads hang long enough to trip the pipeline timeout.
struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

#[async_trait]
impl DocumentStore for SlowStore {
    async fn insert(&self, collection: &str, record: Document) -> Result<Document, StoreError> {
        self.inner.insert(collection, record).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_by_field(collection, field, value).await
    }

    async fn find_page(
        &self,
        collection: &str,
        query: &PageQuery,
    ) -> Result<(Vec<Document>, u64), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find_page(collection, query).await
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
        record: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.inner.replace_by_id(collection, id_field, id, record).await
    }

    async fn delete_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.inner.delete_by_id(collection, id_field, id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

#[tokio::test]
async fn slow_store_reads_surface_as_timeouts() {
    let registry = Arc::new(Registry::new(erp_sdk::catalog()).unwrap());
    let inner = MemoryStore::new();
    inner.ensure_collections(&registry);
    let store = SlowStore {
        inner,
        delay: Duration::from_millis(100),
    };
    let pipeline = Pipeline::with_timeout(Arc::new(store), Duration::from_millis(5));
    let desc = registry.by_path("faqs").unwrap();

    let err = pipeline.get(desc, None, "FAQ0001").await.unwrap_err();
    assert!(matches!(err, AppError::Timeout));
    let err = pipeline.list(desc, None, &HashMap::new()).await.unwrap_err();
    assert!(matches!(err, AppError::Timeout));
}

#[tokio::test]
async fn status_transitions_are_not_policed() {
    // Status fields are validated values, not state machines: a
    // Cancelled -> In Progress regression is accepted.
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("batch-cards").unwrap();

    let mut body = sample_body(desc);
    body.insert("status".into(), json!("Cancelled"));
    let created = pipeline.create(desc, Some(TEST_USER), &body).await.unwrap();
    let id = str_field(&created, "batch_id").to_string();

    let mut regress = sample_body(desc);
    regress.insert("status".into(), json!("In Progress"));
    let updated = pipeline
        .update(desc, Some(TEST_USER), &id, &regress)
        .await
        .unwrap();
    assert_eq!(str_field(&updated, "status"), "In Progress");
}

#[tokio::test]
async fn nested_array_violations_carry_index_and_path() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("journal-entries").unwrap();

    let mut body = sample_body(desc);
    body.insert(
        "entries".into(),
        json!([
            { "account_id": "A1", "debit_amount": 100, "credit_amount": 0, "description": "ok" },
            { "account_id": "A2", "debit_amount": -5, "credit_amount": 0, "description": "bad" }
        ]),
    );
    let err = pipeline.create(desc, None, &body).await.unwrap_err();
    let AppError::Validation(violations) = err else {
        panic!("expected validation error");
    };
    assert!(violations
        .iter()
        .any(|v| v.path == "entries[1].debit_amount"));
}

#[tokio::test]
async fn date_only_strings_are_coerced() {
    let (registry, pipeline) = memory_pipeline();
    let desc = registry.by_path("stock-aging").unwrap();

    let mut body = sample_body(desc);
    body.insert("aging_date".into(), json!("2024-06-30"));
    let created = pipeline.create(desc, None, &body).await.unwrap();
    assert_eq!(
        str_field(&created, "aging_date"),
        "2024-06-30T00:00:00.000Z"
    );
}
