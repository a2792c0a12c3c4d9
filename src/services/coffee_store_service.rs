// src/services/coffee_store_service.rs
// DOCUMENTATION: Create-on-view and upvote flow
// PURPOSE: Keep one record per place and count votes against it

use crate::db::RecordStore;
use crate::errors::StoreError;
use crate::models::{
    CreateCoffeeStoreRequest, EnsureOutcome, NewStoreRecord, StoreRecord, UpvoteOutcome,
};

pub struct CoffeeStoreService;

/// Trimmed, non-empty value or None
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl CoffeeStoreService {
    /// Make sure a record exists for the place in `req`
    /// DOCUMENTATION: Idempotent per id. An existing record is returned
    /// untouched, even if `req` lacks a name. New records start at zero votes.
    pub async fn ensure_persisted(
        store: &dyn RecordStore,
        req: CreateCoffeeStoreRequest,
    ) -> Result<EnsureOutcome, StoreError> {
        let id = present(req.id.as_deref())
            .ok_or_else(|| StoreError::InvalidInput("ID is missing".to_string()))?
            .to_string();

        let existing = store.find_by_external_id(&id).await?;
        if !existing.is_empty() {
            log::debug!("Coffee store {} already persisted", id);
            return Ok(EnsureOutcome::Existing(existing));
        }

        let name = present(req.name.as_deref())
            .ok_or_else(|| StoreError::ValidationError("name is missing".to_string()))?
            .to_string();

        let fields = NewStoreRecord {
            external_id: id,
            name,
            address: req.address.unwrap_or_default(),
            neighbourhood: req.neighbourhood.unwrap_or_default(),
            img_url: req.img_url,
            voting: 0,
        };

        let (record, created) = store.create_if_absent(&fields).await?;
        if created {
            log::info!("Persisted coffee store {} ({})", record.external_id, store.backend());
            Ok(EnsureOutcome::Created(record))
        } else {
            Ok(EnsureOutcome::Existing(vec![record]))
        }
    }

    /// Add one vote to the record for `id`
    /// DOCUMENTATION: An unknown id is not an error; nothing is written
    pub async fn upvote(
        store: &dyn RecordStore,
        id: Option<&str>,
    ) -> Result<UpvoteOutcome, StoreError> {
        let id = present(id).ok_or_else(|| StoreError::InvalidInput("Id is missing".to_string()))?;

        match store.increment_votes(id).await? {
            Some(record) => {
                log::info!("Upvoted coffee store {} to {}", id, record.voting);
                Ok(UpvoteOutcome::Upvoted(record))
            }
            None => {
                log::info!("Upvote for unknown coffee store {}", id);
                Ok(UpvoteOutcome::Missing(id.to_string()))
            }
        }
    }

    /// Records stored for `id` (empty when none)
    pub async fn find(
        store: &dyn RecordStore,
        id: Option<&str>,
    ) -> Result<Vec<StoreRecord>, StoreError> {
        let id = present(id).ok_or_else(|| StoreError::InvalidInput("Id is missing".to_string()))?;
        store.find_by_external_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryRecordStore;

    fn request(id: &str, name: Option<&str>) -> CreateCoffeeStoreRequest {
        CreateCoffeeStoreRequest {
            id: Some(id.to_string()),
            name: name.map(str::to_string),
            neighbourhood: Some("Ogui".to_string()),
            address: Some("12 Market Rd".to_string()),
            img_url: Some("https://img/1".to_string()),
            voting: Some(serde_json::json!(7)),
        }
    }

    #[tokio::test]
    async fn test_ensure_persisted_is_idempotent() {
        let store = MemoryRecordStore::new();

        let first = CoffeeStoreService::ensure_persisted(&store, request("fsq-1", Some("Bean There")))
            .await
            .unwrap();
        let created = match first {
            EnsureOutcome::Created(record) => record,
            other => panic!("expected creation, got {:?}", other),
        };
        assert_eq!(created.voting, 0); // client-sent voting is ignored
        assert_eq!(created.neighbourhood, "Ogui");

        let second = CoffeeStoreService::ensure_persisted(&store, request("fsq-1", Some("Bean There")))
            .await
            .unwrap();
        assert_eq!(second, EnsureOutcome::Existing(vec![created]));
        assert_eq!(store.record_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_name_writes_nothing() {
        let store = MemoryRecordStore::new();

        let result = CoffeeStoreService::ensure_persisted(&store, request("fsq-1", None)).await;
        assert!(matches!(result, Err(StoreError::ValidationError(ref m)) if m == "name is missing"));

        let blank = CoffeeStoreService::ensure_persisted(&store, request("fsq-1", Some("  "))).await;
        assert!(matches!(blank, Err(StoreError::ValidationError(_))));

        assert_eq!(store.record_count().await, 0);
    }

    #[tokio::test]
    async fn test_existing_record_found_without_name() {
        let store = MemoryRecordStore::new();
        CoffeeStoreService::ensure_persisted(&store, request("fsq-1", Some("Bean There")))
            .await
            .unwrap();

        let found = CoffeeStoreService::ensure_persisted(&store, request("fsq-1", None))
            .await
            .unwrap();
        assert!(matches!(found, EnsureOutcome::Existing(ref r) if r.len() == 1));
    }

    #[tokio::test]
    async fn test_missing_id_is_invalid_input() {
        let store = MemoryRecordStore::new();
        let req = CreateCoffeeStoreRequest {
            name: Some("Bean There".to_string()),
            ..Default::default()
        };

        let result = CoffeeStoreService::ensure_persisted(&store, req).await;
        assert!(matches!(result, Err(StoreError::InvalidInput(_))));
        assert_eq!(store.record_count().await, 0);
    }

    #[tokio::test]
    async fn test_upvote_adds_exactly_one() {
        let store = MemoryRecordStore::new();
        CoffeeStoreService::ensure_persisted(&store, request("fsq-1", Some("Bean There")))
            .await
            .unwrap();

        for expected in 1..=3 {
            match CoffeeStoreService::upvote(&store, Some("fsq-1")).await.unwrap() {
                UpvoteOutcome::Upvoted(record) => assert_eq!(record.voting, expected),
                other => panic!("expected upvote, got {:?}", other),
            }
        }

        let stored = CoffeeStoreService::find(&store, Some("fsq-1")).await.unwrap();
        assert_eq!(stored[0].voting, 3);
    }

    #[tokio::test]
    async fn test_upvote_unknown_id_creates_nothing() {
        let store = MemoryRecordStore::new();

        let outcome = CoffeeStoreService::upvote(&store, Some("fsq-404")).await.unwrap();
        assert_eq!(outcome, UpvoteOutcome::Missing("fsq-404".to_string()));
        assert_eq!(store.record_count().await, 0);
    }

    #[tokio::test]
    async fn test_upvote_requires_id() {
        let store = MemoryRecordStore::new();
        assert!(matches!(
            CoffeeStoreService::upvote(&store, None).await,
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            CoffeeStoreService::upvote(&store, Some("")).await,
            Err(StoreError::InvalidInput(_))
        ));
    }
}
