//! Outbound ports - Interfaces that the application requires from external systems

mod catalog_port;
mod character_document_port;

pub use catalog_port::{CatalogEntryView, CatalogKind, CatalogView, EntityStorageError};
pub use character_document_port::{CharacterDocumentPort, LoadOutcome};
