// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export the record store gateway and its local backends

pub mod memory_store;
pub mod record_store;
pub mod repository;

pub use memory_store::*;
pub use record_store::*;
pub use repository::*;
