//! Character document persistence
//!
//! Characters live in standalone XML documents. Catalog keys inside a
//! document are resolved through the shared [`CatalogRegistry`] on load.
//!
//! [`CatalogRegistry`]: crate::infrastructure::catalog::CatalogRegistry

mod character_document;
mod document_schema;

pub use character_document::XmlCharacterDocumentStore;

#[cfg(test)]
pub(crate) use character_document::fixtures;
