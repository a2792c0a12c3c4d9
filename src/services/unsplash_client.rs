// src/services/unsplash_client.rs
// DOCUMENTATION: Unsplash photo search client
// PURPOSE: Fetch a batch of stock photo URLs to decorate place listings

use crate::errors::StoreError;
use crate::services::PhotoSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub struct UnsplashClient {
    client: Client,
    access_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct UnsplashSearchResponse {
    #[serde(default)]
    pub results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
pub struct UnsplashPhoto {
    pub urls: UnsplashUrls,
}

/// Renditions of a photo; only the small one is used for cards
#[derive(Debug, Deserialize)]
pub struct UnsplashUrls {
    pub small: String,
}

impl UnsplashClient {
    pub fn new(access_key: String) -> Self {
        Self {
            client: Client::new(),
            access_key,
            base_url: "https://api.unsplash.com".to_string(),
        }
    }
}

#[async_trait]
impl PhotoSource for UnsplashClient {
    async fn photo_urls(&self, query: &str, per_page: u32) -> Result<Vec<String>, StoreError> {
        if self.access_key.is_empty() {
            return Err(StoreError::Configuration(
                "UNSPLASH_ACCESS_KEY not configured".to_string(),
            ));
        }

        let url = format!("{}/search/photos", self.base_url);
        let params = [
            ("query", query.to_string()),
            ("page", "1".to_string()),
            ("per_page", per_page.to_string()),
        ];

        let response = self
            .client
            .get(&url)
            .header("Accept-Version", "v1")
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Unsplash request failed: {}", e);
                StoreError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Unsplash API error {}: {}", status, body);
            return Err(StoreError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let api_response: UnsplashSearchResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Unsplash response: {}", e);
            StoreError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        Ok(api_response
            .results
            .into_iter()
            .map(|photo| photo.urls.small)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_small_urls() {
        let body = r#"{
            "total": 2,
            "total_pages": 1,
            "results": [
                { "id": "a", "urls": { "raw": "https://u/a/raw", "small": "https://u/a/small" } },
                { "id": "b", "urls": { "raw": "https://u/b/raw", "small": "https://u/b/small" } }
            ]
        }"#;

        let response: UnsplashSearchResponse = serde_json::from_str(body).unwrap();
        let urls: Vec<String> = response.results.into_iter().map(|p| p.urls.small).collect();
        assert_eq!(urls, vec!["https://u/a/small", "https://u/b/small"]);
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let client = UnsplashClient::new(String::new());
        let result = client.photo_urls("food", 40).await;
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }
}
