// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod poi_store;

#[cfg(test)]
pub mod test_support;

pub use poi_store::*;
