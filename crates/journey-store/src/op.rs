//! Operation envelope appended to `insights.jsonl`.
//!
//! The log is the source of truth for [`JsonlStore`](crate::JsonlStore):
//! opening the store replays every operation in file order. Old lines
//! without a `v` field deserialize with `v == 1`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current log format version.
pub const STORE_OP_VERSION: u32 = 1;

const fn default_version() -> u32 {
    STORE_OP_VERSION
}

/// What an operation does to the record it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOpKind {
    /// Insert or replace the full field map.
    Put,
    Delete,
}

/// A single line of the store log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreOp {
    #[serde(default = "default_version")]
    pub v: u32,

    /// When the operation was written.
    pub ts: DateTime<Utc>,

    pub op: StoreOpKind,

    /// ID of the affected insight.
    pub id: String,

    /// Full tagged field map for `put`, `null` for `delete`.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl StoreOp {
    #[must_use]
    pub fn put(ts: DateTime<Utc>, id: String, data: serde_json::Value) -> Self {
        Self {
            v: STORE_OP_VERSION,
            ts,
            op: StoreOpKind::Put,
            id,
            data,
        }
    }

    #[must_use]
    pub fn delete(ts: DateTime<Utc>, id: String) -> Self {
        Self {
            v: STORE_OP_VERSION,
            ts,
            op: StoreOpKind::Delete,
            id,
            data: serde_json::Value::Null,
        }
    }
}
