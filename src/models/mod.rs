// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod poi;
pub mod price;

pub use poi::*;
pub use price::*;
