//! Process-local store.

use std::sync::{Arc, RwLock};

use journey_core::insight::Insight;
use journey_schema::InsightCodec;

use crate::error::StoreError;
use crate::store::{InsightStore, Records};

/// `HashMap`-backed store. Contents are lost when it is dropped.
pub struct MemoryStore {
    codec: Arc<InsightCodec>,
    records: RwLock<Records>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(codec: Arc<InsightCodec>) -> Self {
        Self {
            codec,
            records: RwLock::new(Records::default()),
        }
    }

    /// Number of stored insights.
    ///
    /// # Errors
    ///
    /// `StoreError::Poisoned` if the index lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    /// # Errors
    ///
    /// `StoreError::Poisoned` if the index lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|n| n == 0)
    }
}

impl InsightStore for MemoryStore {
    fn save(&self, insight: Insight) -> Result<Insight, StoreError> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        let (insight, id, fields) = records.prepare(&self.codec, insight)?;
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
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
