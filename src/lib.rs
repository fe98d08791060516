//! Kindred Sheet - Catalog-backed character sheets for Vampire: The Masquerade
//!
//! - Domain: validated entities, translated names and the character aggregate
//! - Application: ports and the character sheet service
//! - Infrastructure: catalog registry, XML documents, configuration

pub mod application;
pub mod domain;
pub mod infrastructure;
