//! Shared application state

use std::sync::Arc;

use crate::application::services::CharacterSheetService;
use crate::infrastructure::catalog::{CatalogRegistry, DefinitionSource};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::XmlCharacterDocumentStore;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Catalogs, warmed up on first use
    pub catalogs: Arc<CatalogRegistry>,
    pub sheets: CharacterSheetService<XmlCharacterDocumentStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let source = DefinitionSource::from_dir(config.catalog_dir.as_deref());
        let catalogs = Arc::new(CatalogRegistry::new(source));
        let documents = XmlCharacterDocumentStore::new(catalogs.clone());
        let sheets = CharacterSheetService::new(documents, catalogs.clone());

        Self {
            config,
            catalogs,
            sheets,
        }
    }
}
