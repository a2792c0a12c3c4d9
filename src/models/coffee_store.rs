// src/models/coffee_store.rs
// DOCUMENTATION: Persisted coffee store records and mutation DTOs
// PURPOSE: Shared by the record store backends, the vote flow and the handlers

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A persisted coffee store
/// DOCUMENTATION: One row per external place id. Serialized in the record
/// store's "minified" shape: the store-assigned id as `recordId`, the place id as `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRecord {
    /// Identifier assigned by the backing store
    pub record_id: String,

    /// External id of the place (join key)
    #[serde(rename = "id")]
    pub external_id: String,

    pub name: String,
    pub address: String,
    pub neighbourhood: String,
    pub img_url: Option<String>,

    /// Vote count, never negative
    pub voting: u32,
}

/// Fields for a record that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewStoreRecord {
    pub external_id: String,
    pub name: String,
    pub address: String,
    pub neighbourhood: String,
    pub img_url: Option<String>,
    pub voting: u32,
}

impl NewStoreRecord {
    /// Build the stored form, assigning the record id chosen by the backend
    pub fn into_record(self, record_id: String) -> StoreRecord {
        StoreRecord {
            record_id,
            external_id: self.external_id,
            name: self.name,
            address: self.address,
            neighbourhood: self.neighbourhood,
            img_url: self.img_url,
            voting: self.voting,
        }
    }
}

/// Partial update of a record
/// DOCUMENTATION: Only the fields set to Some are written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreRecordPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub neighbourhood: Option<String>,
    pub img_url: Option<String>,
    pub voting: Option<u32>,
}

impl StoreRecordPatch {
    pub fn voting(voting: u32) -> Self {
        StoreRecordPatch {
            voting: Some(voting),
            ..Default::default()
        }
    }

    /// Apply the set fields onto an existing record
    pub fn apply(&self, record: &mut StoreRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(address) = &self.address {
            record.address = address.clone();
        }
        if let Some(neighbourhood) = &self.neighbourhood {
            record.neighbourhood = neighbourhood.clone();
        }
        if let Some(img_url) = &self.img_url {
            record.img_url = Some(img_url.clone());
        }
        if let Some(voting) = self.voting {
            record.voting = voting;
        }
    }
}

/// Request DTO for POST /api/createCoffeeStore
/// DOCUMENTATION: `id` and `name` are optional on the wire so that their
/// absence is reported as a 400 with a message instead of a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoffeeStoreRequest {
    #[validate(length(max = 255))]
    pub id: Option<String>,

    #[validate(length(max = 255))]
    pub name: Option<String>,

    #[serde(default)]
    pub neighbourhood: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub img_url: Option<String>,

    /// Accepted in any shape and ignored, new records always start at zero votes
    #[serde(default)]
    pub voting: Option<serde_json::Value>,
}

/// Request DTO for PUT /api/upvoteCoffeeStoreById
#[derive(Debug, Deserialize)]
pub struct UpvoteRequest {
    pub id: Option<String>,
}

/// Query parameters for GET /api/getCoffeeStoreById
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub id: Option<String>,
}

/// Result of ensuring a place is persisted
#[derive(Debug, Clone, PartialEq)]
pub enum EnsureOutcome {
    /// A record already existed; nothing was written
    Existing(Vec<StoreRecord>),
    /// A new record was written
    Created(StoreRecord),
}

/// Result of an upvote
#[derive(Debug, Clone, PartialEq)]
pub enum UpvoteOutcome {
    Upvoted(StoreRecord),
    /// No record exists for the id; nothing was written
    Missing(String),
}

/// Body returned when a record is created
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub records: Vec<StoreRecord>,
}

/// Body returned when an upvote targets an unknown id
#[derive(Debug, Serialize)]
pub struct MissingResponse {
    pub message: &'static str,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> StoreRecord {
        StoreRecord {
            record_id: "rec1".to_string(),
            external_id: "fsq-1".to_string(),
            name: "Bean There".to_string(),
            address: "12 Market Rd".to_string(),
            neighbourhood: "Ogui".to_string(),
            img_url: None,
            voting: 3,
        }
    }

    #[test]
    fn test_record_wire_shape() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["recordId"], "rec1");
        assert_eq!(json["id"], "fsq-1");
        assert_eq!(json["imgUrl"], serde_json::Value::Null);
        assert_eq!(json["voting"], 3);
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut rec = record();
        StoreRecordPatch::voting(4).apply(&mut rec);
        assert_eq!(rec.voting, 4);
        assert_eq!(rec.name, "Bean There");
        assert_eq!(rec.address, "12 Market Rd");
    }

    #[test]
    fn test_create_request_decodes_camel_case() {
        let req: CreateCoffeeStoreRequest = serde_json::from_str(
            r#"{"id":"fsq-1","name":"Bean There","imgUrl":"https://img/1","voting":0}"#,
        )
        .unwrap();
        assert_eq!(req.id.as_deref(), Some("fsq-1"));
        assert_eq!(req.img_url.as_deref(), Some("https://img/1"));
        assert!(req.address.is_none());
    }

    #[test]
    fn test_create_request_accepts_any_voting() {
        for body in [
            r#"{"id":"fsq-1","voting":-1}"#,
            r#"{"id":"fsq-1","voting":1.5}"#,
            r#"{"id":"fsq-1","voting":"0"}"#,
        ] {
            let req: CreateCoffeeStoreRequest = serde_json::from_str(body).unwrap();
            assert_eq!(req.id.as_deref(), Some("fsq-1"));
        }
    }
}
