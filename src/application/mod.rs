//! Application layer - Use cases and the ports they depend on
//!
//! - Ports: outbound traits implemented by infrastructure adapters
//! - Services: character sheet use cases
//! - DTO: serializable views for the front end

pub mod dto;
pub mod ports;
pub mod services;
