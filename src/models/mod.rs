// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod coffee_store;
pub mod place;

pub use coffee_store::*;
pub use place::*;
