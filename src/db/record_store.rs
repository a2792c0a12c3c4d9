// src/db/record_store.rs
// DOCUMENTATION: Record store gateway
// PURPOSE: Backend-neutral access to persisted coffee stores

use crate::errors::StoreError;
use crate::models::{NewStoreRecord, StoreRecord, StoreRecordPatch};
use async_trait::async_trait;

/// Gateway over a tabular record store keyed by external place id
/// DOCUMENTATION: Backends implement the three primitives. The two flow
/// operations have look-then-write defaults; backends that can express them as a
/// single conditional or atomic write override them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and the health endpoint
    fn backend(&self) -> &'static str;

    /// Records whose external id matches exactly (0 or 1 expected)
    async fn find_by_external_id(&self, external_id: &str)
        -> Result<Vec<StoreRecord>, StoreError>;

    async fn create(&self, fields: &NewStoreRecord) -> Result<StoreRecord, StoreError>;

    /// Partial update; NotFound when `record_id` is unknown
    async fn update(
        &self,
        record_id: &str,
        patch: &StoreRecordPatch,
    ) -> Result<StoreRecord, StoreError>;

    /// Create the record unless one exists for its external id.
    /// Returns the stored record and whether this call created it.
    ///
    /// The default looks up first, so two concurrent callers can both create.
    async fn create_if_absent(
        &self,
        fields: &NewStoreRecord,
    ) -> Result<(StoreRecord, bool), StoreError> {
        let existing = self.find_by_external_id(&fields.external_id).await?;
        if let Some(record) = existing.into_iter().next() {
            return Ok((record, false));
        }

        let created = self.create(fields).await?;
        Ok((created, true))
    }

    /// Add one vote to the record for `external_id`; None when no record exists.
    ///
    /// The default reads, increments and writes back, so concurrent calls can
    /// lose increments.
    async fn increment_votes(&self, external_id: &str) -> Result<Option<StoreRecord>, StoreError> {
        let existing = self.find_by_external_id(external_id).await?;
        let record = match existing.into_iter().next() {
            Some(record) => record,
            None => return Ok(None),
        };

        let voting = record.voting.checked_add(1).ok_or_else(|| {
            StoreError::RecordStoreError(format!("vote count overflow for {}", external_id))
        })?;

        let updated = self
            .update(&record.record_id, &StoreRecordPatch::voting(voting))
            .await?;
        Ok(Some(updated))
    }
}
