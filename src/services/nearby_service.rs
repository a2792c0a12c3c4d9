// src/services/nearby_service.rs
// DOCUMENTATION: Nearby search with photo decoration
// PURPOSE: Combine the places provider and the photo provider into one listing

use crate::errors::StoreError;
use crate::models::{EnrichedPlace, LatLong, Place};
use async_trait::async_trait;

/// Location-based place search
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Places near `ll` matching `query`, at most `limit` of them
    async fn search(&self, ll: &LatLong, query: &str, limit: u32)
        -> Result<Vec<Place>, StoreError>;
}

/// Stock photo search
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Up to `per_page` photo URLs for `query`
    async fn photo_urls(&self, query: &str, per_page: u32) -> Result<Vec<String>, StoreError>;
}

/// What to search for, independent of where
#[derive(Debug, Clone)]
pub struct SearchTerms {
    pub places_query: String,
    pub photos_query: String,
    pub photos_per_page: u32,
}

pub struct NearbyService;

impl NearbyService {
    /// Fetch places near `ll` and decorate them with stock photos
    /// DOCUMENTATION: The photo batch does not depend on location or limit.
    /// Either upstream failing fails the whole call; nothing is retried.
    pub async fn fetch_nearby(
        places: &dyn PlaceSource,
        photos: &dyn PhotoSource,
        terms: &SearchTerms,
        ll: &LatLong,
        limit: u32,
    ) -> Result<Vec<EnrichedPlace>, StoreError> {
        let photo_urls = photos
            .photo_urls(&terms.photos_query, terms.photos_per_page)
            .await?;

        let mut found = places.search(ll, &terms.places_query, limit).await?;
        // Providers may ignore the limit
        found.truncate(limit as usize);

        log::info!(
            "Nearby search at {} returned {} places, {} photos",
            ll,
            found.len(),
            photo_urls.len()
        );

        Ok(Self::merge_photos(found, photo_urls))
    }

    /// Give the i-th place the i-th photo, if there is one
    /// DOCUMENTATION: Positional pairing only; places past the end of the
    /// photo list get no image and the caller picks a default.
    pub fn merge_photos(places: Vec<Place>, photo_urls: Vec<String>) -> Vec<EnrichedPlace> {
        let mut photo_urls = photo_urls.into_iter();
        places
            .into_iter()
            .map(|place| EnrichedPlace {
                place,
                img_url: photo_urls.next(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn place(n: usize) -> Place {
        Place {
            id: format!("fsq-{}", n),
            name: format!("Cafe {}", n),
            address: String::new(),
            neighbourhood: String::new(),
            latitude: None,
            longitude: None,
        }
    }

    fn photos(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://img/{}", i)).collect()
    }

    struct FakePlaces {
        available: usize,
        calls: Mutex<Vec<(String, String, u32)>>,
    }

    #[async_trait]
    impl PlaceSource for FakePlaces {
        async fn search(
            &self,
            ll: &LatLong,
            query: &str,
            limit: u32,
        ) -> Result<Vec<Place>, StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push((ll.to_string(), query.to_string(), limit));
            Ok((0..self.available.min(limit as usize)).map(place).collect())
        }
    }

    struct FakePhotos {
        available: usize,
    }

    #[async_trait]
    impl PhotoSource for FakePhotos {
        async fn photo_urls(&self, _query: &str, per_page: u32) -> Result<Vec<String>, StoreError> {
            Ok(photos(self.available.min(per_page as usize)))
        }
    }

    struct FailingPhotos;

    #[async_trait]
    impl PhotoSource for FailingPhotos {
        async fn photo_urls(&self, _query: &str, _per_page: u32) -> Result<Vec<String>, StoreError> {
            Err(StoreError::ExternalApiError("API error 401".to_string()))
        }
    }

    fn terms() -> SearchTerms {
        SearchTerms {
            places_query: "coffee".to_string(),
            photos_query: "coffee".to_string(),
            photos_per_page: 40,
        }
    }

    fn ll() -> LatLong {
        LatLong::new(6.5466, 7.4288).unwrap()
    }

    #[test]
    fn test_merge_more_photos_than_places() {
        let merged = NearbyService::merge_photos((0..3).map(place).collect(), photos(5));
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].img_url.as_deref(), Some("https://img/0"));
        assert_eq!(merged[1].img_url.as_deref(), Some("https://img/1"));
        assert_eq!(merged[2].img_url.as_deref(), Some("https://img/2"));
    }

    #[test]
    fn test_merge_fewer_photos_than_places() {
        let merged = NearbyService::merge_photos((0..5).map(place).collect(), photos(2));
        assert_eq!(merged.len(), 5);
        assert!(merged[0].img_url.is_some());
        assert!(merged[1].img_url.is_some());
        assert!(merged[2..].iter().all(|p| p.img_url.is_none()));
        assert_eq!(merged[4].place.id, "fsq-4");
    }

    #[tokio::test]
    async fn test_fetch_nearby_limit_three_five_photos() {
        let places = FakePlaces {
            available: 10,
            calls: Mutex::new(Vec::new()),
        };
        let result = NearbyService::fetch_nearby(&places, &FakePhotos { available: 5 }, &terms(), &ll(), 3)
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
        let mut urls: Vec<_> = result.iter().filter_map(|p| p.img_url.clone()).collect();
        assert_eq!(urls.len(), 3);
        urls.dedup();
        assert_eq!(urls.len(), 3);

        let calls = places.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "coffee");
        assert_eq!(calls[0].2, 3);
    }

    #[tokio::test]
    async fn test_fetch_nearby_limit_five_two_photos() {
        let places = FakePlaces {
            available: 10,
            calls: Mutex::new(Vec::new()),
        };
        let result = NearbyService::fetch_nearby(&places, &FakePhotos { available: 2 }, &terms(), &ll(), 5)
            .await
            .unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(result.iter().filter(|p| p.img_url.is_some()).count(), 2);
        assert!(result[0].img_url.is_some() && result[1].img_url.is_some());
    }

    #[tokio::test]
    async fn test_fetch_nearby_propagates_photo_failure() {
        let places = FakePlaces {
            available: 3,
            calls: Mutex::new(Vec::new()),
        };
        let result = NearbyService::fetch_nearby(&places, &FailingPhotos, &terms(), &ll(), 3).await;

        assert!(matches!(result, Err(StoreError::ExternalApiError(_))));
        assert!(places.calls.lock().unwrap().is_empty());
    }
}
