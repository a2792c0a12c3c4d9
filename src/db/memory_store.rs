// src/db/memory_store.rs
// DOCUMENTATION: In-process record store
// PURPOSE: Development backend (RECORD_STORE=memory) and test double

use crate::db::RecordStore;
use crate::errors::StoreError;
use crate::models::{NewStoreRecord, StoreRecord, StoreRecordPatch};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Record store held in memory
/// DOCUMENTATION: Keyed by record id like a hosted table. Uses the gateway's
/// default look-then-write flow, so it shares the hosted store's races.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, StoreRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Vec<StoreRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.external_id == external_id)
            .cloned()
            .collect())
    }

    async fn create(&self, fields: &NewStoreRecord) -> Result<StoreRecord, StoreError> {
        let record = fields.clone().into_record(format!("rec{}", Uuid::new_v4().simple()));
        self.records
            .write()
            .await
            .insert(record.record_id.clone(), record.clone());
        log::debug!("Memory store created record {}", record.record_id);
        Ok(record)
    }

    async fn update(
        &self,
        record_id: &str,
        patch: &StoreRecordPatch,
    ) -> Result<StoreRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(record_id)
            .ok_or_else(|| StoreError::NotFound(record_id.to_string()))?;
        patch.apply(record);
        Ok(record.clone())
    }
}
