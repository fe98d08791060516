//! Domain layer - Entity model with no I/O
//!
//! This layer contains:
//! - Entities: catalog definitions (clans, disciplines, ...) and the Character aggregate
//! - Value Objects: identifiers, languages, category tags
//! - Errors: build-time validation failures

pub mod entities;
pub mod error;
pub mod value_objects;
