// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod airtable_client;
pub mod coffee_store_service;
pub mod foursquare_client;
pub mod nearby_service;
pub mod unsplash_client;

pub use airtable_client::*;
pub use coffee_store_service::*;
pub use foursquare_client::*;
pub use nearby_service::*;
pub use unsplash_client::*;
