//! PostgreSQL adapter: one JSONB document table per resource collection,
//! unique indexes per declared unique field. Tables live in a schema
//! named from `ERP_SCHEMA` env (default `erp`).

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

use crate::descriptor::Registry;
use crate::store::{Document, DocumentStore, PageQuery, StoreError};

/// Schema name for document tables. Must be a valid PostgreSQL identifier.
pub fn erp_schema() -> String {
    std::env::var("ERP_SCHEMA").unwrap_or_else(|_| "erp".into())
}

/// Quote identifier for PostgreSQL (safe: only from the catalog).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Quote a JSON field name for use inside `doc->>'...'`.
fn quoted_key(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn unique_index_name(collection: &str, field: &str) -> String {
    format!("{}_{}_key", collection, field)
}

/// Recover the violated field from a unique-index name built by
/// `ensure_collections`.
fn field_from_constraint(collection: &str, constraint: &str) -> Option<String> {
    constraint
        .strip_suffix("_key")?
        .strip_prefix(&format!("{}_", collection))
        .map(|f| f.to_string())
}

fn map_insert_error(collection: &str, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = e {
        if db.code().as_deref() == Some("23505") {
            let field = db
                .constraint()
                .and_then(|c| field_from_constraint(collection, c))
                .unwrap_or_else(|| "unknown".to_string());
            return StoreError::DuplicateKey { field };
        }
    }
    StoreError::Db(e)
}

pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore {
            pool,
            schema: erp_schema(),
        }
    }

    fn table(&self, collection: &str) -> String {
        format!("{}.{}", quoted(&self.schema), quoted(collection))
    }

    /// Create the schema, one document table per catalog collection, and
    /// a unique index per declared unique field (id field included).
    pub async fn ensure_collections(&self, registry: &Registry) -> Result<(), StoreError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&self.schema)))
            .execute(&self.pool)
            .await?;
        for desc in registry.resources() {
            let table = self.table(&desc.collection);
            let ddl = format!("CREATE TABLE IF NOT EXISTS {} (doc JSONB NOT NULL)", table);
            sqlx::query(&ddl).execute(&self.pool).await?;

            let mut unique_fields = vec![desc.id_field.clone()];
            unique_fields.extend(desc.unique_fields.iter().cloned());
            for field in unique_fields {
                let index = format!(
                    "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ((doc->>{}))",
                    quoted(&unique_index_name(&desc.collection, &field)),
                    table,
                    quoted_key(&field)
                );
                sqlx::query(&index).execute(&self.pool).await?;
            }
        }
        Ok(())
    }

    fn where_clause(query: &PageQuery, params_from: usize) -> (String, Vec<Value>) {
        let mut parts = Vec::new();
        let mut params = Vec::new();
        for (i, (field, value)) in query.filter.iter().enumerate() {
            parts.push(format!("doc->{} = ${}", quoted_key(field), params_from + i));
            params.push(value.clone());
        }
        let clause = if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        };
        (clause, params)
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, collection: &str, record: Document) -> Result<Document, StoreError> {
        let sql = format!(
            "INSERT INTO {} (doc) VALUES ($1) RETURNING doc",
            self.table(collection)
        );
        tracing::debug!(sql = %sql, "query");
        let doc: Value = sqlx::query_scalar(&sql)
            .bind(Value::Object(record))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_insert_error(collection, e))?;
        object_of(doc)
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            "SELECT doc FROM {} WHERE doc->>$1 = $2 LIMIT 1",
            self.table(collection)
        );
        tracing::debug!(sql = %sql, field = %field, "query");
        let doc: Option<Value> = sqlx::query_scalar(&sql)
            .bind(field)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        doc.map(object_of).transpose()
    }

    async fn find_page(
        &self,
        collection: &str,
        query: &PageQuery,
    ) -> Result<(Vec<Document>, u64), StoreError> {
        let table = self.table(collection);
        let (where_clause, params) = Self::where_clause(query, 1);
        let direction = if query.descending { "DESC" } else { "ASC" };
        let order = format!(
            " ORDER BY (doc->>{})::timestamptz {} NULLS LAST, doc->>{} {}",
            quoted_key(&query.sort_field),
            direction,
            quoted_key(&query.tie_breaker),
            direction
        );

        let count_sql = format!("SELECT COUNT(*) FROM {}{}", table, where_clause);
        tracing::debug!(sql = %count_sql, "query");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for p in &params {
            count_query = count_query.bind(p.clone());
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let page_sql = format!(
            "SELECT doc FROM {}{}{} LIMIT {} OFFSET {}",
            table, where_clause, order, query.limit, query.skip
        );
        tracing::debug!(sql = %page_sql, "query");
        let mut page_query = sqlx::query_scalar::<_, Value>(&page_sql);
        for p in &params {
            page_query = page_query.bind(p.clone());
        }
        let rows = page_query.fetch_all(&self.pool).await?;

        let docs = rows
            .into_iter()
            .map(object_of)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((docs, total.max(0) as u64))
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
        record: Document,
    ) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            "UPDATE {} SET doc = $1 WHERE doc->>$2 = $3 RETURNING doc",
            self.table(collection)
        );
        tracing::debug!(sql = %sql, "query");
        let doc: Option<Value> = sqlx::query_scalar(&sql)
            .bind(Value::Object(record))
            .bind(id_field)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_insert_error(collection, e))?;
        doc.map(object_of).transpose()
    }

    async fn delete_by_id(
        &self,
        collection: &str,
        id_field: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE doc->>$1 = $2 RETURNING doc",
            self.table(collection)
        );
        tracing::debug!(sql = %sql, "query");
        let doc: Option<Value> = sqlx::query_scalar(&sql)
            .bind(id_field)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        doc.map(object_of).transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

fn object_of(value: Value) -> Result<Document, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Db(sqlx::Error::Decode(
            "stored document is not a JSON object".into(),
        ))),
    }
}

/// Ensure the database in `database_url` exists; create it if not.
/// Connects to the default `postgres` database to run CREATE DATABASE.
/// Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| StoreError::Db(sqlx::Error::Configuration("DATABASE_URL: no path".into())))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{field_from_constraint, parse_db_name_from_url, unique_index_name};

    #[test]
    fn constraint_round_trip() {
        let name = unique_index_name("e_invoices", "invoice_number");
        assert_eq!(
            field_from_constraint("e_invoices", &name).as_deref(),
            Some("invoice_number")
        );
        assert_eq!(field_from_constraint("e_invoices", "other_key"), None);
    }

    #[test]
    fn db_name_parsing() {
        let (admin, name) = parse_db_name_from_url("postgres://localhost:5432/erp?sslmode=off").unwrap();
        assert_eq!(admin, "postgres://localhost:5432/postgres");
        assert_eq!(name, "erp");
    }
}
