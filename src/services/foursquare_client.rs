// src/services/foursquare_client.rs
// DOCUMENTATION: Foursquare Places API client
// PURPOSE: Location-based place search for the nearby listing

use crate::errors::StoreError;
use crate::models::{LatLong, Place};
use crate::services::PlaceSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Foursquare Places API client
/// DOCUMENTATION: The API key goes verbatim into the Authorization header
pub struct FoursquareClient {
    /// HTTP client for making requests
    client: Client,
    /// Foursquare API key
    api_key: String,
    /// Base URL for the Places API
    base_url: String,
}

/// Response from the Places search endpoint
#[derive(Debug, Deserialize)]
pub struct FoursquareSearchResponse {
    #[serde(default)]
    pub results: Vec<FoursquarePlace>,
}

/// Individual place from Foursquare
#[derive(Debug, Clone, Deserialize)]
pub struct FoursquarePlace {
    /// Foursquare's unique place identifier
    pub fsq_id: String,
    pub name: String,
    #[serde(default)]
    pub location: FoursquareLocation,
    pub geocodes: Option<FoursquareGeocodes>,
}

/// Address block of a Foursquare place
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoursquareLocation {
    pub address: Option<String>,
    pub formatted_address: Option<String>,
    pub cross_street: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoursquareGeocodes {
    pub main: Option<FoursquarePoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoursquarePoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<FoursquarePlace> for Place {
    fn from(fsq: FoursquarePlace) -> Self {
        let point = fsq.geocodes.and_then(|g| g.main);
        Place {
            id: fsq.fsq_id,
            name: fsq.name,
            // Prefer formatted_address over the bare street line
            address: fsq
                .location
                .formatted_address
                .or(fsq.location.address)
                .unwrap_or_default(),
            neighbourhood: fsq.location.cross_street.unwrap_or_default(),
            latitude: point.as_ref().map(|p| p.latitude),
            longitude: point.as_ref().map(|p| p.longitude),
        }
    }
}

impl FoursquareClient {
    /// Create new Foursquare Places API client
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.foursquare.com/v3/places".to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Query parameters for a search
    fn search_params(ll: &LatLong, query: &str, limit: u32) -> Vec<(&'static str, String)> {
        vec![
            ("query", query.to_string()),
            ("ll", ll.to_string()),
            ("limit", limit.to_string()),
        ]
    }
}

#[async_trait]
impl PlaceSource for FoursquareClient {
    /// Search places near a point
    ///
    /// # Arguments
    /// * `ll` - Center point
    /// * `query` - Free-text term (e.g. "coffee")
    /// * `limit` - Maximum results (provider caps at 50)
    async fn search(
        &self,
        ll: &LatLong,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Place>, StoreError> {
        if self.api_key.is_empty() {
            return Err(StoreError::Configuration(
                "FOURSQUARE_API_KEY not configured".to_string(),
            ));
        }

        let url = format!("{}/search", self.base_url);

        log::debug!("Foursquare search: ll={}, query={}, limit={}", ll, query, limit);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .header("Authorization", &self.api_key)
            .query(&Self::search_params(ll, query, limit))
            .send()
            .await
            .map_err(|e| {
                log::error!("Foursquare request failed: {}", e);
                StoreError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Foursquare API error {}: {}", status, body);
            return Err(StoreError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: FoursquareSearchResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Foursquare response: {}", e);
            StoreError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        log::info!("Foursquare search returned {} results", api_response.results.len());

        Ok(api_response.results.into_iter().map(Place::from).collect())
    }
}
