// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export route configurations

pub mod health;
pub mod nearby;

pub use health::config as health_config;
pub use nearby::config as nearby_config;
