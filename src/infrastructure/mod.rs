//! Infrastructure layer - Adapters and process wiring
//!
//! This layer contains:
//! - Catalog: definition documents and the lazily warmed registry
//! - Persistence: XML character documents
//! - Xml: element tree shared by both document kinds
//! - Config: Application configuration
//! - State: Shared application state

pub mod catalog;
pub mod config;
pub mod persistence;
pub mod state;
pub mod xml;
