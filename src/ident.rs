//! Record identifier generation.
//!
//! Prefixed identifiers keep each resource's historical prefix
//! (`BATCH-`, `WO`, `GSTR-`) in front of a sortable suffix: a
//! zero-padded millisecond timestamp followed by 48 random bits in hex.
//! Identifiers generated later always sort later; the random tail keeps
//! same-millisecond collisions vanishingly rare. Uniqueness is still
//! advisory only — the create pipeline retries on an insert collision.

use chrono::Utc;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdStrategy {
    /// `prefix` + 13-digit millisecond timestamp + 12 hex chars of entropy.
    /// Any separator is part of the prefix itself ("BATCH-" vs "WO").
    Prefixed { prefix: String },
    /// Bare v4 UUID, for resources that historically used one.
    Uuid,
}

impl IdStrategy {
    pub fn prefixed(prefix: &str) -> Self {
        IdStrategy::Prefixed {
            prefix: prefix.to_string(),
        }
    }
}

pub fn generate(strategy: &IdStrategy) -> String {
    match strategy {
        IdStrategy::Uuid => Uuid::new_v4().to_string(),
        IdStrategy::Prefixed { prefix } => {
            let millis = Utc::now().timestamp_millis().max(0) as u128;
            let entropy = Uuid::new_v4().as_u128() & 0xffff_ffff_ffff;
            format!("{}{:013}{:012x}", prefix, millis, entropy)
        }
    }
}
