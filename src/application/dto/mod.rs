//! Data Transfer Objects - For output boundaries
//!
//! DTOs live in the application layer so the command line front end can
//! serialize without pulling serde into the domain model.

pub mod character_summary;

pub use character_summary::*;
