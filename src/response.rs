//! Standard response envelopes. List replies carry `{data, pagination}`,
//! single-record replies carry `{data}`; one shape for every resource.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Serialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl Pagination {
    /// `pages = ceil(total / limit)`; limit is always >= 1 by the time it
    /// reaches here.
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        let pages = total.div_ceil(limit.max(1));
        Pagination { total, page, pages }
    }
}

#[derive(Debug, Serialize)]
pub struct ListEnvelope {
    pub data: Vec<Value>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct DataEnvelope {
    pub data: Value,
}

pub fn created(data: Value) -> (StatusCode, Json<DataEnvelope>) {
    (StatusCode::CREATED, Json(DataEnvelope { data }))
}

pub fn ok(data: Value) -> (StatusCode, Json<DataEnvelope>) {
    (StatusCode::OK, Json(DataEnvelope { data }))
}
