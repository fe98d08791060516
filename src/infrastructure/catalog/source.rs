//! Where catalog definition documents come from

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::application::ports::outbound::{CatalogKind, EntityStorageError};

/// Definition documents compiled into the binary or read from a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DefinitionSource {
    #[default]
    Embedded,
    /// Files in this directory replace the embedded ones; missing files fall back
    Directory(PathBuf),
}

impl DefinitionSource {
    pub fn from_dir(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::Directory(dir.to_path_buf()),
            None => Self::Embedded,
        }
    }

    /// Document text for one catalog kind
    pub fn read(&self, kind: CatalogKind) -> Result<String, EntityStorageError> {
        match self {
            Self::Embedded => Ok(embedded(kind).to_string()),
            Self::Directory(dir) => {
                let path = dir.join(kind.file_name());
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        tracing::debug!(catalog = %kind, path = %path.display(), "Using override definitions");
                        Ok(text)
                    }
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        tracing::debug!(catalog = %kind, "No override file, using embedded definitions");
                        Ok(embedded(kind).to_string())
                    }
                    Err(e) => Err(EntityStorageError::io(path, e)),
                }
            }
        }
    }

    /// Human-readable origin used in error messages
    pub fn origin(&self, kind: CatalogKind) -> String {
        match self {
            Self::Embedded => format!("embedded {}", kind.file_name()),
            Self::Directory(dir) => dir.join(kind.file_name()).display().to_string(),
        }
    }
}

fn embedded(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Attributes => include_str!("../../../data/catalogs/attributes.xml"),
        CatalogKind::Abilities => include_str!("../../../data/catalogs/abilities.xml"),
        CatalogKind::Advantages => include_str!("../../../data/catalogs/advantages.xml"),
        CatalogKind::Clans => include_str!("../../../data/catalogs/clans.xml"),
        CatalogKind::Weaknesses => include_str!("../../../data/catalogs/weaknesses.xml"),
        CatalogKind::Generations => include_str!("../../../data/catalogs/generations.xml"),
        CatalogKind::Roads => include_str!("../../../data/catalogs/roads.xml"),
        CatalogKind::Natures => include_str!("../../../data/catalogs/natures.xml"),
        CatalogKind::SpecialFeatures => {
            include_str!("../../../data/catalogs/special_features.xml")
        }
    }
}
