// src/models/place.rs
// DOCUMENTATION: Place data returned by the nearby search
// PURPOSE: Provider-neutral place, photo decoration and search query DTOs

use geo_types::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Coordinate pair used for proximity searches
/// DOCUMENTATION: Parsed from and rendered as "lat,lng", the form the places
/// provider expects in its `ll` parameter. Stored as a point with x = longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLong(Point<f64>);

impl LatLong {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude out of range: {}", latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude out of range: {}", longitude));
        }
        Ok(LatLong(Point::new(longitude, latitude)))
    }

    pub fn latitude(&self) -> f64 {
        self.0.y()
    }

    pub fn longitude(&self) -> f64 {
        self.0.x()
    }
}

impl FromStr for LatLong {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected \"lat,lng\", got {:?}", s))?;

        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("invalid latitude: {:?}", lat))?;
        let longitude: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("invalid longitude: {:?}", lng))?;

        LatLong::new(latitude, longitude)
    }
}

impl fmt::Display for LatLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude(), self.longitude())
    }
}

/// A place returned by the places provider
/// DOCUMENTATION: Immutable once fetched. `id` is the provider's identifier
/// and the join key into the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// External id assigned by the places provider
    pub id: String,

    pub name: String,

    /// Formatted street address (empty when the provider has none)
    pub address: String,

    /// Cross street or neighbourhood (empty when the provider has none)
    pub neighbourhood: String,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Place decorated with a stock photo
/// DOCUMENTATION: The photo is matched by position in the result list, not by
/// content; it is decoration only. `img_url` is None when the photo batch ran out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPlace {
    #[serde(flatten)]
    pub place: Place,

    #[serde(rename = "imgUrl")]
    pub img_url: Option<String>,
}

/// Query parameters for GET /api/getCoffeeStoresByLocation
#[derive(Debug, Deserialize, Validate)]
pub struct NearbyQuery {
    /// "lat,lng"; the configured default is used when absent
    #[serde(rename = "latLong")]
    pub lat_long: Option<String>,

    /// Maximum number of places (provider caps at 50)
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<u32>,
}
