// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod coffee_stores;
pub mod health;

pub use coffee_stores::config as coffee_stores_config;
pub use health::config as health_config;
