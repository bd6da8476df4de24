//! Append-only JSONL store.
//!
//! Every save appends a `put` operation carrying the full field map and
//! every delete appends a `delete` operation to `{dir}/insights.jsonl`.
//! Opening the store replays the log in file order to rebuild the index.
//! Lines that fail to parse are skipped with a warning. A final line with no
//! trailing newline is terminated before any new operation is appended.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use journey_core::insight::Insight;
use journey_schema::InsightCodec;
use serde_json::Value;

use crate::error::StoreError;
use crate::op::{STORE_OP_VERSION, StoreOp, StoreOpKind};
use crate::store::{InsightStore, Records};

/// Log file name inside the store directory.
pub const LOG_FILE: &str = "insights.jsonl";

/// What [`JsonlStore::open`] found in the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub applied: u32,
    pub skipped: u32,
}

pub struct JsonlStore {
    codec: Arc<InsightCodec>,
    path: PathBuf,
    records: RwLock<Records>,
    stats: ReplayStats,
}

impl JsonlStore {
    /// Open (or create) the store in `dir` and replay its log.
    ///
    /// # Errors
    ///
    /// `StoreError::Io` if the directory cannot be created or the log
    /// cannot be read.
    pub fn open(dir: impl AsRef<Path>, codec: Arc<InsightCodec>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE);

        let mut records = Records::default();
        let stats = if path.exists() {
            let stats = replay(&path, &mut records)?;
            terminate_last_line(&path)?;
            stats
        } else {
            ReplayStats::default()
        };
        tracing::debug!(
            path = %path.display(),
            applied = stats.applied,
            skipped = stats.skipped,
            live = records.len(),
            "opened insight store"
        );

        Ok(Self {
            codec,
            path,
            records: RwLock::new(records),
            stats,
        })
    }

    /// Path of the backing log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn replay_stats(&self) -> ReplayStats {
        self.stats
    }

    fn append(&self, op: &StoreOp) -> Result<(), StoreError> {
        serde_jsonlines::append_json_lines(&self.path, [op])?;
        Ok(())
    }
}

/// Append a newline when the log ends mid-line, so the next operation starts
/// on a line of its own.
fn terminate_last_line(path: &Path) -> Result<(), StoreError> {
    let bytes = std::fs::read(path)?;
    if bytes.last().is_none_or(|&b| b == b'\n') {
        return Ok(());
    }
    tracing::warn!(path = %path.display(), "store log ends without a newline, terminating last line");
    let mut file = std::fs::OpenOptions::new().append(true).open(path)?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    Ok(())
}

fn replay(path: &Path, records: &mut Records) -> Result<ReplayStats, StoreError> {
    let mut stats = ReplayStats::default();
    for (line, result) in serde_jsonlines::json_lines(path)?.enumerate() {
        let op: StoreOp = match result {
            Ok(op) => op,
            Err(e) if matches!(e.kind(), ErrorKind::InvalidData | ErrorKind::UnexpectedEof) => {
                tracing::warn!(line = line + 1, error = %e, "skipping unreadable store line");
                stats.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if op.v != STORE_OP_VERSION {
            tracing::warn!(line = line + 1, version = op.v, id = %op.id, "skipping unsupported store version");
            stats.skipped += 1;
            continue;
        }
        match (op.op, op.data) {
            (StoreOpKind::Put, Value::Object(fields)) => records.insert(op.id, fields),
            (StoreOpKind::Put, _) => {
                tracing::warn!(line = line + 1, id = %op.id, "skipping put without a field map");
                stats.skipped += 1;
                continue;
            }
            (StoreOpKind::Delete, _) => {
                records.remove(&op.id);
            }
        }
        stats.applied += 1;
    }
    Ok(stats)
}

impl InsightStore for JsonlStore {
    fn save(&self, insight: Insight) -> Result<Insight, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let (insight, id, fields) = records.prepare(&self.codec, insight)?;
        self.append(&StoreOp::put(
            self.codec.now(),
            id.clone(),
            Value::Object(fields.clone()),
        ))?;
        records.insert(id, fields);
        Ok(insight)
    }

    fn get(&self, id: &str) -> Result<Insight, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        records.get(&self.codec, id)
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Insight>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        records.list_for_user(&self.codec, user_id)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        if !records.contains(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.append(&StoreOp::delete(self.codec.now(), id.to_string()))?;
        records.remove(id);
        Ok(())
    }
}
