// src/services/airtable_client.rs
// DOCUMENTATION: Airtable REST API client
// PURPOSE: Hosted record store backend (RECORD_STORE=airtable)

use crate::db::RecordStore;
use crate::errors::StoreError;
use crate::models::{NewStoreRecord, StoreRecord, StoreRecordPatch};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{Deserialize, Serialize};

/// Airtable table gateway
/// DOCUMENTATION: Airtable offers neither conditional writes nor atomic
/// increments, so this backend keeps the gateway's default look-then-write flow.
pub struct AirtableStore {
    client: Client,
    api_key: String,
    /// https://api.airtable.com/v0/{base}/{table}
    table_url: Url,
}

/// Column values of a coffee store row
/// DOCUMENTATION: Airtable omits empty cells, so every field is optional on
/// read; unset fields are left out on write.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirtableFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AirtableRecord {
    pub id: String,
    #[serde(default)]
    pub fields: AirtableFields,
}

#[derive(Debug, Deserialize)]
pub struct AirtableRecordList {
    #[serde(default)]
    pub records: Vec<AirtableRecord>,
}

#[derive(Debug, Serialize)]
struct WriteRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    fields: AirtableFields,
}

#[derive(Debug, Serialize)]
struct WriteBody<'a> {
    records: Vec<WriteRecord<'a>>,
}

impl From<AirtableRecord> for StoreRecord {
    fn from(record: AirtableRecord) -> Self {
        let fields = record.fields;
        StoreRecord {
            record_id: record.id,
            external_id: fields.id.unwrap_or_default(),
            name: fields.name.unwrap_or_default(),
            address: fields.address.unwrap_or_default(),
            neighbourhood: fields.neighbourhood.unwrap_or_default(),
            img_url: fields.img_url,
            voting: fields.voting.unwrap_or(0),
        }
    }
}

impl From<&NewStoreRecord> for AirtableFields {
    fn from(new: &NewStoreRecord) -> Self {
        AirtableFields {
            id: Some(new.external_id.clone()),
            name: Some(new.name.clone()),
            address: Some(new.address.clone()),
            neighbourhood: Some(new.neighbourhood.clone()),
            img_url: new.img_url.clone(),
            voting: Some(new.voting),
        }
    }
}

impl From<&StoreRecordPatch> for AirtableFields {
    fn from(patch: &StoreRecordPatch) -> Self {
        AirtableFields {
            id: None,
            name: patch.name.clone(),
            address: patch.address.clone(),
            neighbourhood: patch.neighbourhood.clone(),
            img_url: patch.img_url.clone(),
            voting: patch.voting,
        }
    }
}

/// Formula matching rows whose `id` column equals `external_id`
fn id_filter_formula(external_id: &str) -> String {
    let escaped = external_id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("id=\"{}\"", escaped)
}

impl AirtableStore {
    pub fn new(api_key: String, base_key: &str, table: &str) -> Result<Self, StoreError> {
        let table_url = Self::table_url("https://api.airtable.com/v0", base_key, table)?;
        Ok(Self {
            client: Client::new(),
            api_key,
            table_url,
        })
    }

    fn table_url(api_root: &str, base_key: &str, table: &str) -> Result<Url, StoreError> {
        if base_key.is_empty() || table.is_empty() {
            return Err(StoreError::Configuration(
                "Airtable base key and table name are required".to_string(),
            ));
        }

        let mut url = Url::parse(api_root)
            .map_err(|e| StoreError::Configuration(format!("Invalid Airtable URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Configuration("Airtable URL cannot be a base".to_string()))?
            .push(base_key)
            .push(table);
        Ok(url)
    }

    /// Send an authenticated request and decode the record list it returns
    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Vec<StoreRecord>, StoreError> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                log::error!("Airtable {} request failed: {}", action, e);
                StoreError::RecordStoreError(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Airtable {} error {}: {}", action, status, body);
            return Err(Self::status_error(status, body));
        }

        let list: AirtableRecordList = response.json().await.map_err(|e| {
            log::error!("Failed to parse Airtable {} response: {}", action, e);
            StoreError::RecordStoreError(format!("Parse error: {}", e))
        })?;

        Ok(list.records.into_iter().map(StoreRecord::from).collect())
    }

    /// Map a non-2xx Airtable answer onto the gateway error
    fn status_error(status: StatusCode, body: String) -> StoreError {
        if status == StatusCode::NOT_FOUND {
            StoreError::NotFound(body)
        } else {
            StoreError::RecordStoreError(format!("API error {}: {}", status, body))
        }
    }

    fn first(records: Vec<StoreRecord>, action: &str) -> Result<StoreRecord, StoreError> {
        records.into_iter().next().ok_or_else(|| {
            StoreError::RecordStoreError(format!("Airtable {} returned no records", action))
        })
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    fn backend(&self) -> &'static str {
        "airtable"
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Vec<StoreRecord>, StoreError> {
        let request = self
            .client
            .get(self.table_url.clone())
            .query(&[("filterByFormula", id_filter_formula(external_id))]);

        self.send(request, "select").await
    }

    async fn create(&self, fields: &NewStoreRecord) -> Result<StoreRecord, StoreError> {
        let body = WriteBody {
            records: vec![WriteRecord {
                id: None,
                fields: AirtableFields::from(fields),
            }],
        };

        let request = self.client.post(self.table_url.clone()).json(&body);
        let record = Self::first(self.send(request, "create").await?, "create")?;
        log::info!("Created Airtable record: {}", record.record_id);
        Ok(record)
    }

    async fn update(
        &self,
        record_id: &str,
        patch: &StoreRecordPatch,
    ) -> Result<StoreRecord, StoreError> {
        let body = WriteBody {
            records: vec![WriteRecord {
                id: Some(record_id),
                fields: AirtableFields::from(patch),
            }],
        };

        let request = self.client.patch(self.table_url.clone()).json(&body);
        Self::first(self.send(request, "update").await?, "update")
    }
}
