// src/db/repository.rs
// DOCUMENTATION: PostgreSQL record store - all SQL queries
// PURPOSE: RecordStore backend with atomic upsert and vote increment

use crate::db::RecordStore;
use crate::errors::StoreError;
use crate::models::{NewStoreRecord, StoreRecord, StoreRecordPatch};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const RECORD_COLUMNS: &str =
    "record_id, external_id, name, address, neighbourhood, img_url, voting";

/// Internal struct for mapping database rows to StoreRecord
#[derive(Debug, FromRow)]
struct CoffeeStoreRow {
    pub record_id: String,
    pub external_id: String,
    pub name: String,
    pub address: String,
    pub neighbourhood: String,
    pub img_url: Option<String>,
    pub voting: i32,
}

impl CoffeeStoreRow {
    fn to_record(self) -> Result<StoreRecord, StoreError> {
        let voting = u32::try_from(self.voting).map_err(|_| {
            StoreError::DatabaseError(format!(
                "negative vote count {} on record {}",
                self.voting, self.record_id
            ))
        })?;

        Ok(StoreRecord {
            record_id: self.record_id,
            external_id: self.external_id,
            name: self.name,
            address: self.address,
            neighbourhood: self.neighbourhood,
            img_url: self.img_url,
            voting,
        })
    }
}

fn to_db_voting(voting: u32) -> Result<i32, StoreError> {
    i32::try_from(voting)
        .map_err(|_| StoreError::InvalidInput(format!("vote count too large: {}", voting)))
}

/// CoffeeStoreRepository: PostgreSQL-backed record store
/// DOCUMENTATION: `external_id` carries a UNIQUE constraint, which lets
/// create_if_absent and increment_votes run as single statements.
pub struct CoffeeStoreRepository {
    pool: PgPool,
}

impl CoffeeStoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the coffee_stores table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS coffee_stores (
                record_id     TEXT PRIMARY KEY,
                external_id   TEXT NOT NULL UNIQUE,
                name          TEXT NOT NULL,
                address       TEXT NOT NULL DEFAULT '',
                neighbourhood TEXT NOT NULL DEFAULT '',
                img_url       TEXT,
                voting        INTEGER NOT NULL DEFAULT 0 CHECK (voting >= 0),
                created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create coffee_stores table: {}", e);
            StoreError::DatabaseError(e.to_string())
        })?;

        log::info!("coffee_stores table ready");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for CoffeeStoreRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Vec<StoreRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM coffee_stores WHERE external_id = $1",
            RECORD_COLUMNS
        );

        let rows = sqlx::query_as::<_, CoffeeStoreRow>(&sql)
            .bind(external_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to find coffee store {}: {}", external_id, e);
                StoreError::DatabaseError(e.to_string())
            })?;

        rows.into_iter().map(CoffeeStoreRow::to_record).collect()
    }

    async fn create(&self, fields: &NewStoreRecord) -> Result<StoreRecord, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO coffee_stores (
                record_id, external_id, name, address, neighbourhood, img_url, voting
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, CoffeeStoreRow>(&sql)
            .bind(Uuid::new_v4().to_string()) // $1
            .bind(&fields.external_id) // $2
            .bind(&fields.name) // $3
            .bind(&fields.address) // $4
            .bind(&fields.neighbourhood) // $5
            .bind(&fields.img_url) // $6
            .bind(to_db_voting(fields.voting)?) // $7
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to create coffee store {}: {}", fields.external_id, e);
                StoreError::DatabaseError(e.to_string())
            })?;

        let record = row.to_record()?;
        log::info!("Created coffee store record: {}", record.record_id);
        Ok(record)
    }

    async fn update(
        &self,
        record_id: &str,
        patch: &StoreRecordPatch,
    ) -> Result<StoreRecord, StoreError> {
        let voting = patch.voting.map(to_db_voting).transpose()?;

        let sql = format!(
            r#"
            UPDATE coffee_stores
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                neighbourhood = COALESCE($4, neighbourhood),
                img_url = COALESCE($5, img_url),
                voting = COALESCE($6, voting),
                updated_at = NOW()
            WHERE record_id = $1
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, CoffeeStoreRow>(&sql)
            .bind(record_id)
            .bind(&patch.name)
            .bind(&patch.address)
            .bind(&patch.neighbourhood)
            .bind(&patch.img_url)
            .bind(voting)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to update coffee store {}: {}", record_id, e);
                StoreError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Coffee store record not found: {}", record_id);
                StoreError::NotFound(record_id.to_string())
            })?;

        row.to_record()
    }

    /// Insert guarded by the unique external_id; a conflicting row is read back
    async fn create_if_absent(
        &self,
        fields: &NewStoreRecord,
    ) -> Result<(StoreRecord, bool), StoreError> {
        let sql = format!(
            r#"
            INSERT INTO coffee_stores (
                record_id, external_id, name, address, neighbourhood, img_url, voting
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (external_id) DO NOTHING
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let inserted = sqlx::query_as::<_, CoffeeStoreRow>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(&fields.external_id)
            .bind(&fields.name)
            .bind(&fields.address)
            .bind(&fields.neighbourhood)
            .bind(&fields.img_url)
            .bind(to_db_voting(fields.voting)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to upsert coffee store {}: {}", fields.external_id, e);
                StoreError::DatabaseError(e.to_string())
            })?;

        if let Some(row) = inserted {
            let record = row.to_record()?;
            log::info!("Created coffee store record: {}", record.record_id);
            return Ok((record, true));
        }

        // Lost the race (or the record predates the call): read the winner back
        let existing = self
            .find_by_external_id(&fields.external_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(fields.external_id.clone()))?;
        Ok((existing, false))
    }

    async fn increment_votes(&self, external_id: &str) -> Result<Option<StoreRecord>, StoreError> {
        let sql = format!(
            r#"
            UPDATE coffee_stores
            SET voting = voting + 1,
                updated_at = NOW()
            WHERE external_id = $1
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, CoffeeStoreRow>(&sql)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to upvote coffee store {}: {}", external_id, e);
                StoreError::DatabaseError(e.to_string())
            })?;

        row.map(CoffeeStoreRow::to_record).transpose()
    }
}
